//! Captures the client identity override from the query string.

use axum::{
    body::Body,
    extract::State,
    http::{Request, Uri},
    middleware::Next,
    response::Response,
};

use crate::http::server::AppState;

/// Value of `param` in the request's query string, if present and non-empty.
pub fn query_override(uri: &Uri, param: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Pin the first override seen for the rest of the server's lifetime.
pub async fn capture_client_override(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(value) = query_override(req.uri(), &state.config.client_param) {
        state.clients.capture(&value);
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_override() {
        let uri: Uri = "/config.json?client=centurylink&x=1".parse().unwrap();
        assert_eq!(query_override(&uri, "client").as_deref(), Some("centurylink"));
        assert_eq!(query_override(&uri, "brand"), None);

        let uri: Uri = "/config.json?client=".parse().unwrap();
        assert_eq!(query_override(&uri, "client"), None);

        let uri: Uri = "/config.json".parse().unwrap();
        assert_eq!(query_override(&uri, "client"), None);
    }
}
