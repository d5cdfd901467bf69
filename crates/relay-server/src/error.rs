use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub enum HttpError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            HttpError::BadRequest(m) => (StatusCode::BAD_REQUEST, m).into_response(),
            HttpError::NotFound(m) => (StatusCode::NOT_FOUND, m).into_response(),
            HttpError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m).into_response(),
        }
    }
}
