//! Liveness probe.

use axum::Json;

use crate::error::AppError;
use crate::models::HealthResponse;

/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: asesor_core::version(),
    })
}

/// Fallback for unknown routes.
pub async fn not_found_handler(uri: axum::http::Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
