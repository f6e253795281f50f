//! llama.cpp server adapter
//!
//! Talks to `llama-server` over its native `/completion` endpoint. The
//! prompt is sent already rendered with the chat template, so the server
//! must not apply one of its own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument};

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_claims::{InferenceParams, InferenceService};

use crate::client::HttpClientConfig;
use crate::error::LlmError;

/// Inference over a llama.cpp HTTP server
///
/// The context size is fixed when the server starts (`--ctx-size`); the
/// per-request value is only logged.
#[derive(Debug, Clone)]
pub struct LlamaCppInference {
    config: HttpClientConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    temperature: f32,
    n_predict: u32,
    stop: &'a [String],
    stream: bool,
    cache_prompt: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: String,
}

impl LlamaCppInference {
    /// Creates an adapter for the server at `config.base_url`
    pub fn new(config: HttpClientConfig) -> Result<Self, LlmError> {
        let client = config.build_client()?;
        Ok(Self { config, client })
    }

    async fn post_completion(&self, prompt: &str, params: &InferenceParams) -> Result<String, LlmError> {
        let url = self.config.url("/completion");
        let body = CompletionRequest {
            prompt,
            temperature: params.temperature,
            n_predict: params.max_tokens,
            stop: &params.stop,
            stream: false,
            cache_prompt: true,
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

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        if parsed.content.trim().is_empty() {
            return Err(LlmError::EmptyCompletion);
        }
        Ok(parsed.content)
    }
}

impl DomainPort for LlamaCppInference {}

#[async_trait]
impl HealthCheckable for LlamaCppInference {
    /// Calls `/health`, which answers 503 while the model is loading
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = self.client.get(self.config.url("/health")).send().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(response) if response.status().is_success() => {
                HealthCheckResult::new("llama-cpp", AdapterHealth::Healthy, latency_ms)
            }
            Ok(response) => HealthCheckResult::new("llama-cpp", AdapterHealth::Unhealthy, latency_ms)
                .with_message(format!("Server returned status {}", response.status().as_u16())),
            Err(e) => HealthCheckResult::new("llama-cpp", AdapterHealth::Unhealthy, latency_ms)
                .with_message(format!("Server unreachable: {}", e)),
        }
    }
}

#[async_trait]
impl InferenceService for LlamaCppInference {
    fn name(&self) -> &str {
        "llama_cpp"
    }

    #[instrument(skip(self, prompt, params), fields(max_tokens = params.max_tokens))]
    async fn complete(&self, prompt: &str, params: &InferenceParams) -> Result<String, PortError> {
        debug!(
            prompt_len = prompt.len(),
            context_size = params.context_size,
            "Sending completion request to llama.cpp"
        );
        self.post_completion(prompt, params).await.map_err(PortError::from)
    }
}
