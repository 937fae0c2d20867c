//! Upstream JSON proxy subsystem.
//!
//! # Data Flow
//! ```text
//! /vam/<suffix> or /recommendations/<suffix>
//!     → upstream.rs (build http://{client}.{host_suffix}/..., single GET)
//!     → sanitize.rs (drop preamble before the first '{', parse JSON)
//!     → 200 + JSON, or 500 + {"error": ...} on transport failure
//! ```
//!
//! # Design Decisions
//! - No timeout, retry or backoff: a hung upstream hangs that request only
//! - Upstream status codes are not relayed; a completed exchange is a 200
//! - Malformed or empty bodies become `{}`

pub mod sanitize;
pub mod upstream;

pub use sanitize::sanitize_body;
pub use upstream::{ProxyError, UpstreamProxy};
