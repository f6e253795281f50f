//! Backend used when no model is configured

use async_trait::async_trait;

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_claims::{InferenceParams, InferenceService};

/// Refuses every completion so each agent takes its fallback path
///
/// Extraction also fails, so every claim routes to manual review; this
/// mode exists for dry runs of the outer surfaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledInference;

impl DomainPort for DisabledInference {}

#[async_trait]
impl HealthCheckable for DisabledInference {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::new("disabled-inference", AdapterHealth::Degraded, 0)
            .with_message("Inference disabled, deterministic fallbacks only")
    }
}

#[async_trait]
impl InferenceService for DisabledInference {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn complete(&self, _prompt: &str, _params: &InferenceParams) -> Result<String, PortError> {
        Err(PortError::unavailable("inference is disabled"))
    }
}
