//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the fixed, ordered route list
//! - Look up the matching route for a request path
//! - Fall back to the single-page application index
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First match wins, in this order: stylesheet, favicon, config redirect,
//!   vam proxy, recommendations proxy, config cache header + static, static,
//!   index
//! - The config cache route only decorates; resolution continues past it

use std::path::PathBuf;

use crate::config::ServerConfig;
use crate::routing::matcher::{
    ExactMatcher, Matcher, PathPrefixMatcher, PathSuffixMatcher, ResolveError, SegmentMatcher,
    StaticResolver,
};

/// Which upstream API a proxied request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Vam,
    Recommendations,
}

impl Upstream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Vam => "vam",
            Upstream::Recommendations => "recommendations",
        }
    }
}

/// Outcome of route lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    /// `*.styl`: compile and serve as CSS.
    Stylesheet,
    /// `/favicon.ico`: redirect to the per-client icon.
    Favicon,
    /// `/config.json`: redirect to the per-client config.
    ConfigRedirect,
    /// `/vam/*`, `/recommendations/*`: JSON proxy with the path suffix.
    Proxy { upstream: Upstream, suffix: String },
    /// A configured folder or file.
    Static { file: PathBuf, config_cache: bool },
    /// A mapped path that tried to leave its folder.
    Forbidden { config_cache: bool },
    /// Single-page application fallback.
    Index { config_cache: bool },
}

impl RouteMatch {
    /// Label used for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            RouteMatch::Stylesheet => "stylesheet",
            RouteMatch::Favicon => "favicon",
            RouteMatch::ConfigRedirect => "config_redirect",
            RouteMatch::Proxy { upstream, .. } => upstream.as_str(),
            RouteMatch::Static { .. } => "static",
            RouteMatch::Forbidden { .. } => "forbidden",
            RouteMatch::Index { .. } => "index",
        }
    }
}

/// The compiled route table.
#[derive(Debug)]
pub struct RouteTable {
    stylesheet: PathSuffixMatcher,
    favicon: ExactMatcher,
    config_redirect: ExactMatcher,
    vam: PathPrefixMatcher,
    recommendations: PathPrefixMatcher,
    config_cache: SegmentMatcher,
    statics: StaticResolver,
}

impl RouteTable {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            stylesheet: PathSuffixMatcher::new(".styl"),
            favicon: ExactMatcher::new("/favicon.ico"),
            config_redirect: ExactMatcher::new("/config.json"),
            vam: PathPrefixMatcher::new("/vam/"),
            recommendations: PathPrefixMatcher::new("/recommendations/"),
            config_cache: SegmentMatcher::new("/config/"),
            statics: StaticResolver::new(&config.root, &config.folders, &config.files),
        }
    }

    /// Find the route for a (rewritten) request path.
    pub fn match_path(&self, path: &str) -> RouteMatch {
        if self.stylesheet.matches(path) {
            return RouteMatch::Stylesheet;
        }
        if self.favicon.matches(path) {
            return RouteMatch::Favicon;
        }
        if self.config_redirect.matches(path) {
            return RouteMatch::ConfigRedirect;
        }
        if let Some(suffix) = self.vam.remainder(path) {
            return RouteMatch::Proxy {
                upstream: Upstream::Vam,
                suffix: suffix.to_string(),
            };
        }
        if let Some(suffix) = self.recommendations.remainder(path) {
            return RouteMatch::Proxy {
                upstream: Upstream::Recommendations,
                suffix: suffix.to_string(),
            };
        }

        let config_cache = self.config_cache.matches(path);
        match self.statics.resolve(path) {
            Ok(Some(file)) => RouteMatch::Static { file, config_cache },
            Ok(None) => RouteMatch::Index { config_cache },
            Err(ResolveError::PathEscape(path)) => {
                tracing::warn!(path = %path, "Rejected static path outside its folder");
                RouteMatch::Forbidden { config_cache }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        let mut config = ServerConfig::default();
        config.merge_defaults();
        RouteTable::from_config(&config)
    }

    #[test]
    fn test_fixed_routes() {
        let t = table();
        assert_eq!(t.match_path("/assets/css/main.styl"), RouteMatch::Stylesheet);
        assert_eq!(t.match_path("/favicon.ico"), RouteMatch::Favicon);
        assert_eq!(t.match_path("/config.json"), RouteMatch::ConfigRedirect);
    }

    #[test]
    fn test_proxy_routes() {
        let t = table();
        assert_eq!(
            t.match_path("/vam/channels/list"),
            RouteMatch::Proxy { upstream: Upstream::Vam, suffix: "channels/list".into() }
        );
        assert_eq!(
            t.match_path("/recommendations/"),
            RouteMatch::Proxy { upstream: Upstream::Recommendations, suffix: String::new() }
        );
        // No trailing slash: not a proxy route.
        assert_eq!(t.match_path("/vam"), RouteMatch::Index { config_cache: false });
    }

    #[test]
    fn test_stylesheet_shadows_static() {
        let t = table();
        assert_eq!(t.match_path("/app/theme.styl"), RouteMatch::Stylesheet);
    }

    #[test]
    fn test_config_subtree_is_flagged() {
        let t = table();
        assert_eq!(
            t.match_path("/config/toshiba/config.json"),
            RouteMatch::Static {
                file: PathBuf::from("./config/toshiba/config.json"),
                config_cache: true,
            }
        );
        assert_eq!(
            t.match_path("/config/app.json"),
            RouteMatch::Static {
                file: PathBuf::from("./config/app.json"),
                config_cache: false,
            }
        );
    }

    #[test]
    fn test_index_fallback() {
        let t = table();
        assert_eq!(t.match_path("/"), RouteMatch::Index { config_cache: false });
        assert_eq!(t.match_path("/index.html"), RouteMatch::Index { config_cache: false });
        assert_eq!(t.match_path("/some/client/route"), RouteMatch::Index { config_cache: false });
    }

    #[test]
    fn test_forbidden() {
        let t = table();
        assert_eq!(
            t.match_path("/assets/../Cargo.toml"),
            RouteMatch::Forbidden { config_cache: false }
        );
    }
}
