//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dev server
//! and the template precompiler. All types derive Serde traits for
//! deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default listening port when neither the config nor `PORT` provides one.
pub const DEFAULT_PORT: u16 = 8000;

/// Default bind host when neither the config nor `HOST`/`HOSTNAME` provides one.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Root configuration for the development server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Favicon served for the site.
    pub favicon: PathBuf,

    /// Single-page application document served for unmatched routes.
    pub index: PathBuf,

    /// Listening port. `None` falls back to `PORT`, then [`DEFAULT_PORT`].
    pub port: Option<u16>,

    /// Bind host. `None` falls back to `HOST`, `HOSTNAME`, then [`DEFAULT_HOST`].
    pub host: Option<String>,

    /// URL prefix under which folders and files are mounted.
    pub root: String,

    /// Logical folder name → filesystem directory.
    pub folders: BTreeMap<String, PathBuf>,

    /// Logical file path → filesystem file.
    pub files: BTreeMap<String, PathBuf>,

    /// Query-string key that pins the client identity.
    pub client_param: String,

    /// Exact hostname → client identity.
    pub host_mapping: BTreeMap<String, String>,

    /// Cache policy for the `/config/:client/*` subtree.
    pub config_cache: ConfigCacheConfig,

    /// On-the-fly stylesheet compilation.
    pub stylesheets: StylesheetConfig,

    /// Proxied upstream JSON APIs.
    pub upstreams: UpstreamsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            favicon: PathBuf::from("./favicon.ico"),
            index: PathBuf::from("./index.html"),
            port: None,
            host: None,
            root: "/".to_string(),
            folders: default_folders(),
            files: default_files(),
            client_param: "client".to_string(),
            host_mapping: default_host_mapping(),
            config_cache: ConfigCacheConfig::default(),
            stylesheets: StylesheetConfig::default(),
            upstreams: UpstreamsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Fill the missing folder and file keys from the built-in defaults.
    ///
    /// Caller-supplied keys always win; default keys are never removed.
    pub fn merge_defaults(&mut self) {
        for (key, path) in default_folders() {
            self.folders.entry(key).or_insert(path);
        }
        for (key, path) in default_files() {
            self.files.entry(key).or_insert(path);
        }
        for (host, client) in default_host_mapping() {
            self.host_mapping.entry(host).or_insert(client);
        }
    }

    /// Apply the environment fallbacks for port and host.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.port.is_none() {
            self.port = lookup("PORT").and_then(|p| p.trim().parse().ok());
        }
        if self.host.is_none() {
            self.host = lookup("HOST").or_else(|| lookup("HOSTNAME"));
        }
    }

    /// Effective listening port.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Effective bind host.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host(), self.port())
    }
}

pub fn default_folders() -> BTreeMap<String, PathBuf> {
    [
        ("app", "./app"),
        ("assets", "./assets"),
        ("dist", "./dist"),
        ("config", "./config"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), PathBuf::from(v)))
    .collect()
}

pub fn default_files() -> BTreeMap<String, PathBuf> {
    let mut files = BTreeMap::new();
    files.insert("app/config.js".to_string(), PathBuf::from("app/config.js"));
    files
}

pub fn default_host_mapping() -> BTreeMap<String, String> {
    [
        ("toshiba.mobile.syn-pub.com", "toshiba"),
        ("centurylink.mobile.syn-pub.com", "centurylink"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Cache-Control policy for config responses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigCacheConfig {
    /// Emit `maxage=<now_ms * 86400>` exactly as the legacy server did.
    /// When false, emit a plain one-day `max-age`.
    pub legacy_max_age: bool,
}

impl Default for ConfigCacheConfig {
    fn default() -> Self {
        Self {
            legacy_max_age: true,
        }
    }
}

/// Stylesheet compilation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StylesheetConfig {
    /// Directory sources are read from; also the import search path.
    pub dir: PathBuf,

    /// URL segment after which the source path begins.
    pub marker: String,
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets/css"),
            marker: "assets/css/".to_string(),
        }
    }
}

/// Both proxied upstreams.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamsConfig {
    /// Target of `/vam/*`.
    pub vam: UpstreamRoute,

    /// Target of `/recommendations/*`.
    pub recommendations: UpstreamRoute,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            vam: UpstreamRoute {
                host_suffix: "am4.syn-api.com".to_string(),
                port: None,
                path_prefix: String::new(),
                connect_to: None,
            },
            recommendations: UpstreamRoute {
                host_suffix: "recs.syn-api.com".to_string(),
                port: Some(8080),
                path_prefix: "v1".to_string(),
                connect_to: None,
            },
        }
    }
}

/// Where a proxied route is forwarded: `http://{client}.{host_suffix}[:port]/{path_prefix}/{suffix}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamRoute {
    /// Domain appended to the client identity.
    pub host_suffix: String,

    /// Upstream port, when not 80.
    #[serde(default)]
    pub port: Option<u16>,

    /// Path segment(s) inserted before the forwarded suffix.
    #[serde(default)]
    pub path_prefix: String,

    /// Dial this socket address instead of resolving the upstream host.
    /// The virtual upstream host is still sent as `Host`.
    #[serde(default)]
    pub connect_to: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// One template precompilation target.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MoteTarget {
    /// Files or directories (walked recursively) to compile.
    pub src: Vec<PathBuf>,

    /// Output JavaScript file.
    pub dest: PathBuf,

    /// Global object the templates are attached to.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Basename pattern identifying partials.
    #[serde(default = "default_partial_pattern")]
    pub partial_pattern: String,

    /// Only compile files with one of these extensions (all files when empty).
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Prefix removed from template names.
    #[serde(default)]
    pub strip_prefix: Option<String>,
}

fn default_namespace() -> String {
    "JST".to_string()
}

fn default_partial_pattern() -> String {
    "^_".to_string()
}
