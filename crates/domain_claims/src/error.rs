//! Claims triage errors
//!
//! None of these escape the pipeline: each one is recovered at the stage
//! where it occurs and only shows up in logs and in the claim record's
//! extraction outcome.

use thiserror::Error;

use core_kernel::{MoneyError, PortError};

/// Errors that can occur while triaging a claim
#[derive(Debug, Error)]
pub enum FnolError {
    /// The document text source could not produce text
    #[error("Text extraction failed: {0}")]
    ExtractionFailure(#[source] PortError),

    /// The inference service failed or answered with nothing usable
    #[error("Inference failed: {0}")]
    InferenceFailure(#[source] PortError),

    /// The completion did not contain a recoverable JSON object
    #[error("Could not recover JSON from completion: {0}")]
    JsonParseFailure(String),

    /// A field needed for a numeric check did not parse
    #[error("Validation failed for {field}: {reason}")]
    ValidationFailure { field: String, reason: String },

    /// The pipeline configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl FnolError {
    pub fn json(message: impl Into<String>) -> Self {
        FnolError::JsonParseFailure(message.into())
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FnolError::ValidationFailure {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn from_money(field: impl Into<String>, error: MoneyError) -> Self {
        FnolError::validation(field, error.to_string())
    }
}
