//! API route handlers
//!
//! - `health`: liveness, readiness and Prometheus metrics
//! - `documents`: upload, processing, batch and stored-record lookup

pub mod documents;
pub mod health;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// Root endpoint (GET /), no authentication.
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "DocIntel Server",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/api/v1/documents",
            "/api/v1/documents/{id}",
            "/api/v1/process",
            "/api/v1/batch",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
