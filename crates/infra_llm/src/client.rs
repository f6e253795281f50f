//! HTTP client configuration and backend selection

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use domain_claims::InferenceService;

use crate::adapters::{DisabledInference, LlamaCppInference, OllamaInference, SerializedInference};
use crate::error::LlmError;

/// Which inference backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceBackend {
    /// llama.cpp `llama-server`
    LlamaCpp,
    /// Ollama daemon
    Ollama,
    /// No model; every agent uses its fallback
    Disabled,
}

impl FromStr for InferenceBackend {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "llama_cpp" | "llamacpp" | "llama" => Ok(InferenceBackend::LlamaCpp),
            "ollama" => Ok(InferenceBackend::Ollama),
            "disabled" | "none" | "off" => Ok(InferenceBackend::Disabled),
            other => Err(LlmError::Configuration(format!("unknown inference backend '{}'", other))),
        }
    }
}

/// Connection settings shared by the HTTP backends
///
/// # Example
///
/// ```rust
/// use infra_llm::HttpClientConfig;
/// use std::time::Duration;
///
/// let config = HttpClientConfig::new("http://localhost:11434/")
///     .model("phi3:mini")
///     .timeout(Duration::from_secs(60));
/// assert_eq!(config.base_url, "http://localhost:11434");
/// ```
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    /// Model name; required by Ollama, ignored by llama.cpp
    pub model: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl HttpClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: None,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client, LlmError> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("cannot build HTTP client: {}", e)))
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

/// Builds the shared inference handle for a backend
///
/// HTTP backends are wrapped in [`SerializedInference`] so concurrent
/// claims reach the model one completion at a time.
///
/// # Errors
///
/// `LlmError::Configuration` when Ollama has no model name or the HTTP
/// client cannot be built.
pub fn build_inference(
    backend: InferenceBackend,
    config: HttpClientConfig,
) -> Result<Arc<dyn InferenceService>, LlmError> {
    info!(?backend, base_url = %config.base_url, "Configuring inference backend");
    let inference: Arc<dyn InferenceService> = match backend {
        InferenceBackend::LlamaCpp => Arc::new(SerializedInference::new(LlamaCppInference::new(config)?)),
        InferenceBackend::Ollama => Arc::new(SerializedInference::new(OllamaInference::new(config)?)),
        InferenceBackend::Disabled => Arc::new(DisabledInference),
    };
    Ok(inference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("llama-cpp".parse::<InferenceBackend>().unwrap(), InferenceBackend::LlamaCpp);
        assert_eq!("Ollama".parse::<InferenceBackend>().unwrap(), InferenceBackend::Ollama);
        assert_eq!("off".parse::<InferenceBackend>().unwrap(), InferenceBackend::Disabled);
        assert!("gpt".parse::<InferenceBackend>().is_err());
    }

    #[test]
    fn test_backend_deserializes_snake_case() {
        let backend: InferenceBackend = serde_json::from_str("\"llama_cpp\"").unwrap();
        assert_eq!(backend, InferenceBackend::LlamaCpp);
    }

    #[test]
    fn test_ollama_requires_model() {
        let result = build_inference(InferenceBackend::Ollama, HttpClientConfig::new("http://localhost:11434"));
        assert!(matches!(result, Err(LlmError::Configuration(_))));
    }

    #[test]
    fn test_disabled_backend_builds() {
        let inference = build_inference(InferenceBackend::Disabled, HttpClientConfig::default()).unwrap();
        assert_eq!(inference.name(), "disabled");
    }
}
