//! Health check handlers

use axum::{extract::State, Json};

use core_kernel::HealthCheckable;
use domain_claims::InferenceService;

use crate::dto::health::{HealthResponse, InferenceHealth, ReadinessResponse};
use crate::{error::ApiError, AppState};

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check (includes the inference backend)
///
/// A degraded backend is still ready: the agents fall back to their
/// deterministic rules.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, ApiError> {
    let result = state.inference.health_check().await;

    if !result.is_operational() {
        return Err(ApiError::ServiceUnavailable(format!(
            "inference backend {} is {:?}: {}",
            state.inference.name(),
            result.status,
            result.message.unwrap_or_default()
        )));
    }

    Ok(Json(ReadinessResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        inference: InferenceHealth {
            backend: state.inference.name().to_string(),
            status: result.status,
            latency_ms: result.latency_ms,
            message: result.message,
        },
    }))
}
