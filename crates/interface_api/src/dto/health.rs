//! Health DTOs

use serde::Serialize;

use core_kernel::AdapterHealth;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub version: String,
    pub inference: InferenceHealth,
}

#[derive(Debug, Serialize)]
pub struct InferenceHealth {
    pub backend: String,
    pub status: AdapterHealth,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
