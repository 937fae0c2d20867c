//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports, non-empty keys and paths)
//! - Check upstream hosts can form a URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{ServerConfig, UpstreamRoute};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("port must be non-zero")]
    ZeroPort,

    #[error("root must start with '/': {0:?}")]
    InvalidRoot(String),

    #[error("{kind} key {key:?} is invalid")]
    InvalidKey { kind: &'static str, key: String },

    #[error("{kind} {key:?} maps to an empty path")]
    EmptyPath { kind: &'static str, key: String },

    #[error("client_param must not be empty")]
    EmptyClientParam,

    #[error("upstream {name}: {reason}")]
    InvalidUpstream { name: &'static str, reason: String },
}

/// Validate a merged configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.port == Some(0) {
        errors.push(ValidationError::ZeroPort);
    }

    if !config.root.starts_with('/') {
        errors.push(ValidationError::InvalidRoot(config.root.clone()));
    }

    for (key, path) in &config.folders {
        if key.is_empty() || key.starts_with('/') || key.ends_with('/') {
            errors.push(ValidationError::InvalidKey { kind: "folder", key: key.clone() });
        }
        if path.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyPath { kind: "folder", key: key.clone() });
        }
    }

    for (key, path) in &config.files {
        if key.is_empty() || key.starts_with('/') || key.ends_with('/') {
            errors.push(ValidationError::InvalidKey { kind: "file", key: key.clone() });
        }
        if path.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyPath { kind: "file", key: key.clone() });
        }
    }

    if config.client_param.is_empty() {
        errors.push(ValidationError::EmptyClientParam);
    }

    validate_upstream("vam", &config.upstreams.vam, &mut errors);
    validate_upstream("recommendations", &config.upstreams.recommendations, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_upstream(name: &'static str, route: &UpstreamRoute, errors: &mut Vec<ValidationError>) {
    let probe = format!("http://client.{}/", route.host_suffix);
    if route.host_suffix.is_empty() || url::Url::parse(&probe).is_err() {
        errors.push(ValidationError::InvalidUpstream {
            name,
            reason: format!("bad host suffix {:?}", route.host_suffix),
        });
    }

    if let Some(addr) = &route.connect_to {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidUpstream {
                name,
                reason: format!("connect_to {addr:?} is not a socket address"),
            });
        }
    }
}
