//! Upstream request construction and forwarding.

use axum::{
    body::Body,
    http::{header, uri::InvalidUri, Method, Request, Uri},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::Value;
use std::time::Instant;
use thiserror::Error;
use url::{Position, Url};

use crate::client::is_client_label;
use crate::config::{UpstreamRoute, UpstreamsConfig};
use crate::observability::metrics;
use crate::proxy::sanitize_body;
use crate::routing::Upstream;

/// Failure talking to an upstream.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid upstream URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid upstream address: {0}")]
    InvalidUri(#[from] InvalidUri),

    #[error("invalid upstream request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("upstream connection closed while reading body: {0}")]
    Body(#[source] axum::Error),
}

/// A fully resolved upstream request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    /// Logical upstream URL, as logged.
    pub url: Url,
    /// URI actually dialed (differs from `url` when `connect_to` is set).
    pub dial: Uri,
    /// `Host` header value.
    pub host: String,
}

/// Forwards proxied routes to the per-client upstream hosts.
pub struct UpstreamProxy {
    client: Client<HttpConnector, Body>,
    routes: UpstreamsConfig,
}

impl UpstreamProxy {
    pub fn new(routes: UpstreamsConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, routes }
    }

    fn route(&self, upstream: Upstream) -> &UpstreamRoute {
        match upstream {
            Upstream::Vam => &self.routes.vam,
            Upstream::Recommendations => &self.routes.recommendations,
        }
    }

    /// Resolve the upstream request for `client` and the proxied path suffix.
    pub fn target(
        &self,
        upstream: Upstream,
        client: &str,
        suffix: &str,
        query: Option<&str>,
    ) -> Result<UpstreamTarget, ProxyError> {
        build_target(self.route(upstream), client, suffix, query)
    }

    /// Issue one GET and return the sanitized JSON body.
    pub async fn fetch(&self, upstream: Upstream, target: &UpstreamTarget) -> Result<Value, ProxyError> {
        let start = Instant::now();
        let result = self.exchange(target).await;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::record_upstream(upstream.as_str(), outcome, start);
        result
    }

    async fn exchange(&self, target: &UpstreamTarget) -> Result<Value, ProxyError> {
        let req = Request::builder()
            .method(Method::GET)
            .uri(target.dial.clone())
            .header(header::HOST, &target.host)
            .body(Body::empty())?;

        let response = self.client.request(req).await?;
        let status = response.status();

        let body = axum::body::to_bytes(Body::new(response.into_body()), usize::MAX)
            .await
            .map_err(ProxyError::Body)?;

        tracing::debug!(
            upstream = %target.url,
            status = %status,
            bytes = body.len(),
            "Upstream responded"
        );

        Ok(sanitize_body(&body))
    }
}

/// Build `http://{client}.{host_suffix}[:port]/[{path_prefix}/]{suffix}[?query]`.
pub fn build_target(
    route: &UpstreamRoute,
    client: &str,
    suffix: &str,
    query: Option<&str>,
) -> Result<UpstreamTarget, ProxyError> {
    let mut raw = format!("http://{}.{}", client, route.host_suffix);
    if !is_client_label(client) {
        return Err(ProxyError::InvalidUrl {
            url: raw,
            source: url::ParseError::InvalidDomainCharacter,
        });
    }
    if let Some(port) = route.port {
        raw.push_str(&format!(":{port}"));
    }
    raw.push('/');
    let prefix = route.path_prefix.trim_matches('/');
    if !prefix.is_empty() {
        raw.push_str(prefix);
        raw.push('/');
    }
    raw.push_str(suffix);
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        raw.push('?');
        raw.push_str(query);
    }

    let url = Url::parse(&raw).map_err(|source| ProxyError::InvalidUrl { url: raw, source })?;
    let host = url[Position::BeforeHost..Position::AfterPort].to_string();
    let dial_authority = route.connect_to.as_deref().unwrap_or(&host);
    let dial: Uri = format!("http://{}{}", dial_authority, &url[Position::BeforePath..]).parse()?;

    Ok(UpstreamTarget { url, dial, host })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vam_url() {
        let routes = UpstreamsConfig::default();
        let target = build_target(&routes.vam, "toshiba", "foo", None).unwrap();

        assert_eq!(target.url.as_str(), "http://toshiba.am4.syn-api.com/foo");
        assert_eq!(target.host, "toshiba.am4.syn-api.com");
        assert_eq!(target.dial, "http://toshiba.am4.syn-api.com/foo".parse::<Uri>().unwrap());
    }

    #[test]
    fn test_recommendations_url_has_port_and_prefix() {
        let routes = UpstreamsConfig::default();
        let target = build_target(&routes.recommendations, "centurylink", "users/7/items", Some("limit=5"))
            .unwrap();

        assert_eq!(
            target.url.as_str(),
            "http://centurylink.recs.syn-api.com:8080/v1/users/7/items?limit=5"
        );
        assert_eq!(target.host, "centurylink.recs.syn-api.com:8080");
    }

    #[test]
    fn test_connect_to_keeps_virtual_host() {
        let mut routes = UpstreamsConfig::default();
        routes.vam.connect_to = Some("127.0.0.1:4000".to_string());
        let target = build_target(&routes.vam, "toshiba", "a/b", None).unwrap();
        assert_eq!(target.dial, "http://127.0.0.1:4000/a/b".parse::<Uri>().unwrap());
        assert_eq!(target.host, "toshiba.am4.syn-api.com");
    }

    #[test]
    fn test_client_cannot_redirect_the_host() {
        let routes = UpstreamsConfig::default();
        for client in ["evil.com/", "x@evil.com/", "127.0.0.1:22#"] {
            let err = build_target(&routes.vam, client, "foo", None).unwrap_err();
            assert!(matches!(err, ProxyError::InvalidUrl { .. }), "client {client}");
        }
    }

    #[test]
    fn test_bad_client_identity() {
        let routes = UpstreamsConfig::default();
        let err = build_target(&routes.vam, "bad client", "x", None).unwrap_err();
        assert!(matches!(err, ProxyError::InvalidUrl { .. }));
    }
}
