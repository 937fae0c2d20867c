//! Route handlers.
//!
//! Every handler that needs a concrete client variant resolves the identity
//! itself and swaps `opal` for the default client.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::client::{concrete, ClientIdentity};
use crate::http::middleware::query_override;
use crate::http::request;
use crate::http::response::{boxed, config_cache_control, found, json, text_error, with_cache_control};
use crate::http::server::AppState;
use crate::routing::Upstream;
use crate::stylesheet::StylesheetError;

/// Client identity for `request`, with `opal` replaced by the default client.
pub fn concrete_client<B>(state: &AppState, request: &Request<B>) -> ClientIdentity {
    let host = request::host(request);
    let query = query_override(request.uri(), &state.config.client_param);
    concrete(state.clients.resolve(host.as_deref(), query.as_deref()))
}

/// `*.styl` → compiled CSS.
pub async fn stylesheet(state: &AppState, path: &str) -> Response {
    match state.stylesheets.render(path).await {
        Ok(css) => ([(header::CONTENT_TYPE, "text/css")], css).into_response(),
        Err(StylesheetError::NotFound(path)) => {
            text_error(StatusCode::NOT_FOUND, format!("Cannot GET {path}"))
        }
        Err(StylesheetError::Read { path, source }) if source.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Stylesheet source missing");
            text_error(StatusCode::NOT_FOUND, format!("Cannot GET {}", path.display()))
        }
        Err(e) => {
            tracing::error!(error = %e, "Stylesheet compilation failed");
            text_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// `/favicon.ico` → `./assets/img/{client}/favicon.ico`.
pub fn favicon<B>(state: &AppState, request: &Request<B>) -> Response {
    let client = concrete_client(state, request);
    found(&format!("./assets/img/{client}/favicon.ico"))
}

/// `/config.json` → `/config/{client}/config.json`.
pub fn config_redirect<B>(state: &AppState, request: &Request<B>) -> Response {
    let client = concrete_client(state, request);
    found(&format!("/config/{client}/config.json"))
}

/// `/vam/*`, `/recommendations/*` → upstream JSON.
///
/// Takes the request head only; the body is never forwarded.
pub async fn proxy(state: &AppState, upstream: Upstream, suffix: &str, request: &Request<()>) -> Response {
    let client = concrete_client(state, request);

    let target = match state.proxy.target(upstream, &client, suffix, request.uri().query()) {
        Ok(target) => target,
        Err(e) => {
            tracing::error!(client = %client, upstream = upstream.as_str(), error = %e, "Cannot build upstream URL");
            return json(StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }));
        }
    };

    tracing::debug!(client = %client, upstream = %target.url, "Proxying request");

    match state.proxy.fetch(upstream, &target).await {
        Ok(body) => json(StatusCode::OK, body),
        Err(e) => {
            tracing::error!(upstream = %target.url, error = %e, "Upstream error");
            json(StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
        }
    }
}

/// Serve one file from disk, adding the config cache header when asked.
pub async fn serve_file(state: &AppState, file: PathBuf, config_cache: bool, request: Request<Body>) -> Response {
    let response = match ServeFile::new(&file).oneshot(request).await {
        Ok(response) => boxed(response),
        Err(never) => match never {},
    };

    if response.status() == StatusCode::NOT_FOUND {
        tracing::debug!(file = %file.display(), "File not found");
    }

    with_config_cache(state, response, config_cache)
}

/// 403 for mapped paths that leave their folder.
pub fn forbidden(state: &AppState, config_cache: bool) -> Response {
    with_config_cache(state, text_error(StatusCode::FORBIDDEN, "Forbidden"), config_cache)
}

fn with_config_cache(state: &AppState, response: Response, config_cache: bool) -> Response {
    if !config_cache {
        return response;
    }
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;
    let value = config_cache_control(now_ms, state.config.config_cache.legacy_max_age);
    with_cache_control(response, &value)
}
