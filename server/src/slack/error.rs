//! Slash Command Request Errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that end a slash command request before its handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlashError {
    /// Command missing from the path or not registered.
    #[error("Command Not Found")]
    NotFound,
    /// Token missing or not matching the command's secret.
    #[error("Unauthorized Request")]
    Unauthorized,
}

impl From<SlashError> for (StatusCode, String) {
    fn from(err: SlashError) -> Self {
        match err {
            SlashError::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
            SlashError::Unauthorized => (StatusCode::UNAUTHORIZED, err.to_string()),
        }
    }
}

impl IntoResponse for SlashError {
    fn into_response(self) -> Response {
        <(StatusCode, String)>::from(self).into_response()
    }
}
