pub mod execution_logs;
pub mod executions;
pub mod exercises;
pub mod plans;
pub mod session_logs;
pub mod sessions;

use axum::Json;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn fallback() -> ApiError {
    ApiError::NoRoute
}
