//! Ollama adapter
//!
//! Uses `/api/generate` in raw mode so Ollama does not wrap the already
//! rendered chat prompt in the model's own template.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument};

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_claims::{InferenceParams, InferenceService};

use crate::client::HttpClientConfig;
use crate::error::LlmError;

/// Inference over a local Ollama daemon
#[derive(Debug, Clone)]
pub struct OllamaInference {
    config: HttpClientConfig,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    raw: bool,
    stream: bool,
    options: GenerateOptions<'a>,
}

#[derive(Serialize)]
struct GenerateOptions<'a> {
    temperature: f32,
    num_predict: u32,
    num_ctx: u32,
    stop: &'a [String],
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaInference {
    /// Creates an adapter; the config must name a model
    pub fn new(config: HttpClientConfig) -> Result<Self, LlmError> {
        let model = config
            .model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| LlmError::Configuration("Ollama requires a model name".to_string()))?;
        let client = config.build_client()?;
        Ok(Self {
            config,
            model,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, params: &InferenceParams) -> Result<String, LlmError> {
        let url = self.config.url("/api/generate");
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            raw: true,
            stream: false,
            options: GenerateOptions {
                temperature: params.temperature,
                num_predict: params.max_tokens,
                num_ctx: params.context_size,
                stop: &params.stop,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::from_request(e, &url, self.config.timeout_ms()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        if parsed.response.trim().is_empty() {
            return Err(LlmError::EmptyCompletion);
        }
        Ok(parsed.response)
    }

    /// Names of the locally available models
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = self.config.url("/api/tags");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LlmError::from_request(e, &url, self.config.timeout_ms()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TagsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;
        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

impl DomainPort for OllamaInference {}

#[async_trait]
impl HealthCheckable for OllamaInference {
    /// Healthy when the configured model is pulled, degraded when it is not
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = self.list_models().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(models) if models.iter().any(|m| m.starts_with(&self.model)) => {
                HealthCheckResult::new("ollama", AdapterHealth::Healthy, latency_ms)
            }
            Ok(_) => HealthCheckResult::new("ollama", AdapterHealth::Degraded, latency_ms)
                .with_message(format!("Model '{}' is not pulled", self.model)),
            Err(e) => HealthCheckResult::new("ollama", AdapterHealth::Unhealthy, latency_ms)
                .with_message(e.to_string()),
        }
    }
}

#[async_trait]
impl InferenceService for OllamaInference {
    fn name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self, prompt, params), fields(model = %self.model))]
    async fn complete(&self, prompt: &str, params: &InferenceParams) -> Result<String, PortError> {
        debug!(prompt_len = prompt.len(), "Sending generate request to Ollama");
        self.generate(prompt, params).await.map_err(PortError::from)
    }
}
