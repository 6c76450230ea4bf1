//! Application error types.
//!
//! `POST /chat` never surfaces these; it answers with an apology instead.
//! The metadata endpoints use them for real failures.

use asesor_core::profile::ProfileError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store configuration unavailable: {0}")]
    ConfigUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::ConfigUnavailable(m) => {
                error!(error = %m, "store configuration unavailable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "config_unavailable",
                    "Store configuration unavailable",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<ProfileError> for AppError {
    fn from(e: ProfileError) -> Self {
        AppError::ConfigUnavailable(e.to_string())
    }
}
