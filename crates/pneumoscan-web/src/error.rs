//! Errors that escape a handler. User-facing failures are rendered into the
//! page instead; only broken templates and malformed requests end up here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::Template(e) => {
                tracing::error!("Failed to render page: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
            }
            WebError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
        }
    }
}

pub type WebResult<T> = Result<T, WebError>;
