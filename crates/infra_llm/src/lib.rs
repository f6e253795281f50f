//! Collaborator Adapters
//!
//! This crate implements the two ports the triage pipeline depends on:
//!
//! - **Inference**: llama.cpp server (`/completion`) and Ollama
//!   (`/api/generate`) over HTTP, a serializing wrapper that keeps the
//!   backend to one request at a time, and a disabled backend that forces
//!   every agent onto its fallback.
//! - **Document text**: files and uploads, with PDF text extraction.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_llm::{build_inference, HttpClientConfig, InferenceBackend};
//!
//! let config = HttpClientConfig::new("http://localhost:8080");
//! let inference = build_inference(InferenceBackend::LlamaCpp, config)?;
//! let pipeline = ClaimPipeline::new(Arc::new(PipelineConfig::default()), inference);
//! ```

pub mod adapters;
pub mod client;
pub mod error;

pub use adapters::{
    DisabledInference, FileTextSource, LlamaCppInference, OllamaInference, SerializedInference,
};
pub use client::{build_inference, HttpClientConfig, InferenceBackend};
pub use error::LlmError;
