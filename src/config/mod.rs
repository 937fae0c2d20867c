//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, [server] or [server.<target>])
//!     → loader.rs (parse & deserialize)
//!     → schema.rs (merge default folders/files/hosts)
//!     → validation.rs (semantic checks)
//!     → environment fallbacks (PORT, HOST, HOSTNAME)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the server starts
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_mote_targets, ConfigError};
pub use schema::{
    ConfigCacheConfig, MoteTarget, ObservabilityConfig, ServerConfig, StylesheetConfig,
    UpstreamRoute, UpstreamsConfig,
};
