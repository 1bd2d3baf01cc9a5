use crate::services::metrics::get_metrics;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

/// Liveness check. The service has no backing store, so being able to answer
/// is the whole check.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "compound-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

pub async fn metrics() -> impl IntoResponse {
    get_metrics()
}

pub async fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Route not found"))
}
