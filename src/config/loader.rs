//! Configuration loading from disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{MoteTarget, ServerConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("No [{0}] table in configuration")]
    MissingTarget(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load the `[server]` table (or `[server.<target>]` when a target is given)
/// from a TOML file.
///
/// A missing file section yields the defaults. Defaults are merged and the
/// result is validated; environment fallbacks are left to the caller.
pub fn load_config(path: &Path, target: Option<&str>) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, target)
}

/// Parse server configuration from TOML text.
pub fn parse_config(content: &str, target: Option<&str>) -> Result<ServerConfig, ConfigError> {
    let document: toml::Table = toml::from_str(content)?;

    let mut config = match (document.get("server"), target) {
        (None, None) => ServerConfig::default(),
        (None, Some(name)) => return Err(ConfigError::MissingTarget(format!("server.{name}"))),
        (Some(server), None) => server.clone().try_into()?,
        (Some(server), Some(name)) => server
            .get(name)
            .ok_or_else(|| ConfigError::MissingTarget(format!("server.{name}")))?
            .clone()
            .try_into()?,
    };

    config.merge_defaults();
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load every `[mote.<target>]` table from a TOML file.
pub fn load_mote_targets(path: &Path) -> Result<BTreeMap<String, MoteTarget>, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_mote_targets(&content)
}

/// Parse template targets from TOML text.
pub fn parse_mote_targets(content: &str) -> Result<BTreeMap<String, MoteTarget>, ConfigError> {
    #[derive(serde::Deserialize, Default)]
    struct Document {
        #[serde(default)]
        mote: BTreeMap<String, MoteTarget>,
    }

    let document: Document = toml::from_str(content)?;
    Ok(document.mote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = parse_config("", None).unwrap();
        assert_eq!(config.root, "/");
        assert_eq!(config.folders.len(), 4);
    }

    #[test]
    fn test_target_table_replaces_base() {
        let toml = r#"
            [server]
            port = 9000
            index = "./base.html"

            [server.debug]
            index = "./debug.html"

            [server.debug.folders]
            vendor = "./vendor"
        "#;

        let base = parse_config(toml, None).unwrap();
        assert_eq!(base.port, Some(9000));
        assert_eq!(base.index, PathBuf::from("./base.html"));

        let debug = parse_config(toml, Some("debug")).unwrap();
        assert_eq!(debug.port, None);
        assert_eq!(debug.index, PathBuf::from("./debug.html"));
        assert_eq!(debug.folders["vendor"], PathBuf::from("./vendor"));
        assert_eq!(debug.folders["app"], PathBuf::from("./app"));
    }

    #[test]
    fn test_missing_target() {
        let err = parse_config("[server]\nport = 1\n", Some("release")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingTarget(name) if name == "server.release"));
    }

    #[test]
    fn test_validation_errors_surface() {
        let err = parse_config("[server]\nport = 0\nclient_param = \"\"\n", None).unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mote_targets() {
        let toml = r#"
            [mote.templates]
            src = ["app/templates"]
            dest = "dist/templates.js"
            extensions = ["mote"]
        "#;
        let targets = parse_mote_targets(toml).unwrap();
        let target = &targets["templates"];
        assert_eq!(target.namespace, "JST");
        assert_eq!(target.partial_pattern, "^_");
        assert_eq!(target.dest, PathBuf::from("dist/templates.js"));
    }
}
