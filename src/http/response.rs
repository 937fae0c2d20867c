//! Response builders shared by the handlers.
//!
//! # Responsibilities
//! - 302 redirects (the legacy server always used `302 Found`)
//! - JSON bodies for proxied responses and proxy failures
//! - Cache-Control value for the config subtree

use axum::{
    body::{Body, Bytes, HttpBody},
    http::{header, HeaderValue, Response as HttpResponse, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// One day, in seconds.
pub const ONE_DAY_SECS: u64 = 60 * 60 * 24;

/// `302 Found` to `location`.
pub fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect location").into_response(),
    }
}

/// JSON body with an explicit status.
pub fn json(status: StatusCode, value: serde_json::Value) -> Response {
    (status, Json(value)).into_response()
}

/// Plain-text error page.
pub fn text_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, message.into()).into_response()
}

/// `Cache-Control` value for config responses.
///
/// The legacy server multiplied the current time in milliseconds by one day in
/// seconds, which grows without bound and is not a real age. `legacy` keeps that
/// value; otherwise a plain one-day `max-age` is produced.
pub fn config_cache_control(now_ms: u64, legacy: bool) -> String {
    if legacy {
        format!("maxage={}", u128::from(now_ms) * u128::from(ONE_DAY_SECS))
    } else {
        format!("max-age={ONE_DAY_SECS}")
    }
}

/// Attach `Cache-Control` to any response.
pub fn with_cache_control<B>(mut response: HttpResponse<B>, value: &str) -> HttpResponse<B> {
    if let Ok(value) = HeaderValue::from_str(value) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    response
}

/// Map any body into an axum [`Response`].
pub fn boxed<B>(response: HttpResponse<B>) -> Response
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<axum::BoxError>,
{
    response.map(Body::new)
}
