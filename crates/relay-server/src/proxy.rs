use crate::{
    error::HttpError,
    state::AppState,
    util::{self, generate_id},
};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Uri, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use bot_relay_api::is_json_content_type;
use serde_json::Value;
use std::sync::Arc;

/// Forwards the request to the bot API method named by the request path and
/// answers with the unwrapped result.
pub async fn proxy_handler(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, HttpError> {
    let request_id = generate_id(20);
    let path = uri.path();
    tracing::info!("🖥 proxy request ({request_id}) received for {path}");

    let content_type = util::content_type(&headers);
    let request_body = if !is_json_content_type(content_type) {
        tracing::debug!("({request_id}) not reading body with content type {content_type:?}");
        None
    } else if body.is_empty() {
        None
    } else {
        let value = serde_json::from_slice::<Value>(&body).map_err(|err| {
            tracing::warn!("({request_id}) invalid json: {err}");
            HttpError::BadRequest(format!("invalid json: {err}"))
        })?;
        tracing::debug!("({request_id}) request body: {value}");
        Some(value).filter(|value| !value.is_null())
    };

    let result: Value = state
        .relay
        .relay(path, request_body.as_ref())
        .await
        .map_err(|err| {
            tracing::error!("({request_id}) bot failed: {err}");
            HttpError::Internal(format!("bot failed: {err}"))
        })?;

    Ok(([(CONTENT_TYPE, "application/json")], util::json_line(&result)).into_response())
}
