//! Strips the `/{appname}/{appversion}` prefix before routing.

use axum::{
    body::Body,
    http::{Request, Uri},
    middleware::Next,
    response::Response,
};
use regex::Regex;
use std::sync::OnceLock;

fn route_base() -> &'static Regex {
    static ROUTE_BASE: OnceLock<Regex> = OnceLock::new();
    ROUTE_BASE.get_or_init(|| {
        Regex::new(r"^/[A-Za-z0-9_]+/[0-9]+/?(.*)$").expect("route base pattern is valid")
    })
}

/// Rewrite `/word/digits[/rest]` to `/rest`; anything else is returned unchanged.
///
/// Applies to the path and query together, so a query string survives the rewrite.
pub fn strip_route_base(path_and_query: &str) -> Option<String> {
    route_base()
        .captures(path_and_query)
        .map(|caps| format!("/{}", caps.get(1).map_or("", |m| m.as_str())))
}

pub async fn rewrite_middleware(mut req: Request<Body>, next: Next) -> Response {
    let original = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    if let Some(rewritten) = strip_route_base(&original) {
        match rewritten.parse::<Uri>() {
            Ok(uri) => {
                tracing::trace!(from = %original, to = %rewritten, "Rewrote route base");
                *req.uri_mut() = uri;
            }
            Err(e) => tracing::debug!(path = %rewritten, error = %e, "Rewritten path is not a valid URI"),
        }
    }

    next.run(req).await
}
