use crate::{error::HttpError, util};
use axum::{body::Bytes, http::HeaderMap};
use bot_relay_api::is_json_content_type;
use serde_json::Value;

/// Receives updates pushed by the bot API. Updates are only logged, the
/// response is always a 500.
pub async fn update_handler(headers: HeaderMap, body: Bytes) -> HttpError {
    tracing::info!("📩 update received");

    if is_json_content_type(util::content_type(&headers)) {
        match serde_json::from_slice::<Value>(&body) {
            Ok(update) => tracing::debug!("update: {update}"),
            Err(err) => tracing::warn!("invalid json in update: {err}"),
        }
    }

    HttpError::Internal("not yet implemented".to_string())
}
