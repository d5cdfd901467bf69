use crate::error::HttpError;

pub async fn unknown_handler() -> HttpError {
    HttpError::NotFound("unknown".to_string())
}
