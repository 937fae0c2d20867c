//! Request-side helpers.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) and echo it on the response
//! - Extract routing-relevant information (host)

use axum::http::{header, HeaderName, Request};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Layer that assigns an `x-request-id` to requests lacking one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer that copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// The request ID, or `"unknown"` when no layer assigned one.
pub fn request_id<B>(req: &Request<B>) -> String {
    req.headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// The Host header, falling back to the URI authority (HTTP/2).
pub fn host<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.uri().authority().map(|a| a.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_host_from_header() {
        let req = Request::builder()
            .uri("/config.json")
            .header("Host", "toshiba.mobile.syn-pub.com")
            .body(Body::empty())
            .unwrap();
        assert_eq!(host(&req).as_deref(), Some("toshiba.mobile.syn-pub.com"));
    }

    #[test]
    fn test_host_missing() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(host(&req), None);
        assert_eq!(request_id(&req), "unknown");
    }
}
