use axum::http::{HeaderMap, header::CONTENT_TYPE};
use serde_json::Value;

pub fn generate_id(length: usize) -> String {
    nanoid::nanoid!(length, &nanoid::alphabet::SAFE[2..])
}

/// Raw `Content-Type` of a request, empty when missing or not visible ASCII.
pub fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// JSON encoding of `value` terminated by a newline.
pub fn json_line(value: &Value) -> String {
    format!("{value}\n")
}
