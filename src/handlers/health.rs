use axum::{extract::State, Json};
use chrono::Utc;

use crate::error::ApiError;
use crate::models::health::HealthResponse;
use crate::AppState;

/// Liveness probe. Does not touch the provider.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        service: state.service_name.clone(),
    })
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}
