//! Claims Triage Ports
//!
//! Port interfaces for the two collaborators the pipeline depends on. The
//! pipeline only sees these traits; concrete adapters live in `infra_llm`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_claims::{ClaimPipeline, PipelineConfig};
//! use std::sync::Arc;
//!
//! let inference: Arc<dyn InferenceService> = Arc::new(LlamaCppInference::new(settings)?);
//! let pipeline = ClaimPipeline::new(Arc::new(PipelineConfig::default()), inference);
//! let record = pipeline.process_text(&text).await;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use core_kernel::{DomainPort, HealthCheckable, PortError};

/// A document submitted for triage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentHandle {
    /// A file on the local filesystem
    Path(PathBuf),
    /// An uploaded document held in memory
    Bytes { name: String, data: Vec<u8> },
}

impl DocumentHandle {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        DocumentHandle::Path(path.into())
    }

    pub fn bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        DocumentHandle::Bytes {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Display name for logs and the claim record
    pub fn name(&self) -> String {
        match self {
            DocumentHandle::Path(path) => path.display().to_string(),
            DocumentHandle::Bytes { name, .. } => name.clone(),
        }
    }

    /// True for a `.pdf` name or content starting with the PDF magic bytes
    pub fn is_pdf(&self) -> bool {
        match self {
            DocumentHandle::Path(path) => path
                .extension()
                .and_then(|e| e.to_str())
                .map_or(false, |e| e.eq_ignore_ascii_case("pdf")),
            DocumentHandle::Bytes { name, data } => {
                data.starts_with(b"%PDF") || name.to_ascii_lowercase().ends_with(".pdf")
            }
        }
    }
}

/// Turns a document into one block of raw text
#[async_trait]
pub trait DocumentTextSource: DomainPort {
    /// Returns the document text; empty text is valid
    async fn extract_text(&self, document: &DocumentHandle) -> Result<String, PortError>;
}

/// Generation parameters for one completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub context_size: u32,
    pub stop: Vec<String>,
}

impl InferenceParams {
    /// Deterministic parameters used for extraction
    pub fn deterministic(max_tokens: u32, context_size: u32) -> Self {
        Self {
            temperature: 0.0,
            max_tokens,
            context_size,
            stop: Vec::new(),
        }
    }

    pub fn with_stop(mut self, stop: impl Into<String>) -> Self {
        self.stop.push(stop.into());
        self
    }
}

/// Language-model completion service
#[async_trait]
pub trait InferenceService: DomainPort + HealthCheckable {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Returns the raw completion for a fully rendered prompt
    async fn complete(&self, prompt: &str, params: &InferenceParams) -> Result<String, PortError>;
}

/// Mock implementations for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use core_kernel::{AdapterHealth, HealthCheckResult};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use crate::prompt::PromptKind;

    #[derive(Debug, Clone)]
    enum Script {
        Respond(String),
        Fail(String),
    }

    /// Inference double that answers by prompt kind
    ///
    /// Kinds without a script fail as unavailable, so an empty
    /// `ScriptedInference` behaves like a dead backend.
    #[derive(Debug, Default, Clone)]
    pub struct ScriptedInference {
        scripts: HashMap<PromptKind, Script>,
        calls: Arc<RwLock<Vec<(PromptKind, InferenceParams)>>>,
    }

    impl ScriptedInference {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answers prompts of `kind` with `completion`
        pub fn respond(mut self, kind: PromptKind, completion: impl Into<String>) -> Self {
            self.scripts.insert(kind, Script::Respond(completion.into()));
            self
        }

        /// Fails prompts of `kind` with a connection error
        pub fn fail(mut self, kind: PromptKind, message: impl Into<String>) -> Self {
            self.scripts.insert(kind, Script::Fail(message.into()));
            self
        }

        /// Kinds of the prompts received so far, in call order
        pub async fn calls(&self) -> Vec<PromptKind> {
            self.calls.read().await.iter().map(|(kind, _)| *kind).collect()
        }

        /// Parameters received with each call
        pub async fn params(&self) -> Vec<(PromptKind, InferenceParams)> {
            self.calls.read().await.clone()
        }

        pub async fn call_count(&self, kind: PromptKind) -> usize {
            self.calls.read().await.iter().filter(|(k, _)| *k == kind).count()
        }
    }

    impl DomainPort for ScriptedInference {}

    #[async_trait]
    impl HealthCheckable for ScriptedInference {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::new("scripted-inference", AdapterHealth::Healthy, 0)
                .with_message("Scripted adapter always healthy")
        }
    }

    #[async_trait]
    impl InferenceService for ScriptedInference {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, prompt: &str, params: &InferenceParams) -> Result<String, PortError> {
            let kind = PromptKind::classify(prompt)
                .ok_or_else(|| PortError::internal("prompt carries no task marker"))?;
            self.calls.write().await.push((kind, params.clone()));

            match self.scripts.get(&kind) {
                Some(Script::Respond(text)) => Ok(text.clone()),
                Some(Script::Fail(message)) => Err(PortError::connection(message.clone())),
                None => Err(PortError::unavailable(format!("no script for {}", kind))),
            }
        }
    }

    /// Text source returning a fixed string for every document
    #[derive(Debug, Clone)]
    pub struct StaticTextSource {
        text: Option<String>,
    }

    impl StaticTextSource {
        pub fn new(text: impl Into<String>) -> Self {
            Self {
                text: Some(text.into()),
            }
        }

        /// A source whose every read fails
        pub fn failing() -> Self {
            Self { text: None }
        }
    }

    impl DomainPort for StaticTextSource {}

    #[async_trait]
    impl DocumentTextSource for StaticTextSource {
        async fn extract_text(&self, document: &DocumentHandle) -> Result<String, PortError> {
            self.text
                .clone()
                .ok_or_else(|| PortError::not_found("Document", document.name()))
        }
    }
}
