//! Upstream body cleanup.

use serde_json::{Map, Value};

/// Parse an upstream body as JSON after dropping everything before the first `{`.
///
/// Upstreams occasionally prefix the payload with a byte-order mark or other
/// junk. An empty remainder, or one that fails to parse, yields `{}`.
pub fn sanitize_body(body: &[u8]) -> Value {
    let start = match body.iter().position(|&b| b == b'{') {
        Some(i) => i,
        None => {
            if !body.iter().all(u8::is_ascii_whitespace) {
                tracing::debug!(len = body.len(), "Upstream body has no JSON object");
            }
            return empty_object();
        }
    };

    match serde_json::from_slice(&body[start..]) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Upstream body is not valid JSON, answering with {{}}");
            empty_object()
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
