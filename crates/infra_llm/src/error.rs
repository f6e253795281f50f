//! Adapter error types
//!
//! Errors raised inside the adapters. They are converted to `PortError` at
//! the port boundary so the pipeline never sees transport details.

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur while talking to a backend or reading a document
#[derive(Debug, Error)]
pub enum LlmError {
    /// The backend could not be reached
    #[error("Cannot reach inference backend at {url}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request exceeded the client timeout
    #[error("Request to {operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    /// The backend answered with a non-success status
    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape
    #[error("Failed to parse backend response: {0}")]
    ResponseParsing(String),

    /// The backend answered with nothing
    #[error("Backend returned an empty completion")]
    EmptyCompletion,

    /// Any other HTTP client failure
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The document could not be read
    #[error("Failed to read document {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The document does not exist
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// The document exceeds the configured size limit
    #[error("Document {name} is {size} bytes, limit is {limit}")]
    DocumentTooLarge { name: String, size: usize, limit: usize },

    /// PDF text extraction failed
    #[error("PDF extraction failed for {name}: {message}")]
    Pdf { name: String, message: String },

    /// Invalid adapter configuration
    #[error("Invalid adapter configuration: {0}")]
    Configuration(String),
}

impl LlmError {
    /// Maps a reqwest error the way the backend failure should be reported
    pub fn from_request(error: reqwest::Error, url: &str, timeout_ms: u64) -> Self {
        if error.is_connect() {
            LlmError::Connection {
                url: url.to_string(),
                source: error,
            }
        } else if error.is_timeout() {
            LlmError::Timeout {
                operation: url.to_string(),
                timeout_ms,
            }
        } else if error.is_decode() {
            LlmError::ResponseParsing(error.to_string())
        } else {
            LlmError::Http(error)
        }
    }
}

impl From<LlmError> for PortError {
    fn from(error: LlmError) -> Self {
        match error {
            LlmError::Connection { url, source } => PortError::Connection {
                message: format!("Cannot reach inference backend at {}", url),
                source: Some(Box::new(source)),
            },
            LlmError::Timeout { operation, timeout_ms } => PortError::Timeout {
                operation,
                duration_ms: timeout_ms,
            },
            LlmError::Status { status, body } => PortError::Upstream { status, body },
            LlmError::DocumentNotFound(name) => PortError::not_found("Document", name),
            LlmError::ResponseParsing(_)
            | LlmError::EmptyCompletion
            | LlmError::DocumentTooLarge { .. }
            | LlmError::Pdf { .. } => PortError::transformation(error.to_string()),
            LlmError::Configuration(_) => PortError::internal(error.to_string()),
            LlmError::Http(source) => PortError::internal_with_source("HTTP client error", source),
            LlmError::Io { name, source } => {
                PortError::internal_with_source(format!("Failed to read document {}", name), source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_upstream() {
        let port: PortError = LlmError::Status {
            status: 503,
            body: "Loading model".to_string(),
        }
        .into();
        assert!(matches!(port, PortError::Upstream { status: 503, .. }));
    }

    #[test]
    fn test_timeout_is_transient() {
        let port: PortError = LlmError::Timeout {
            operation: "http://localhost:8080/completion".to_string(),
            timeout_ms: 120_000,
        }
        .into();
        assert!(port.is_transient());
    }

    #[test]
    fn test_missing_document_maps_to_not_found() {
        let port: PortError = LlmError::DocumentNotFound("claim.pdf".to_string()).into();
        assert!(port.is_not_found());
    }

    #[test]
    fn test_empty_completion_is_a_transformation_error() {
        let port: PortError = LlmError::EmptyCompletion.into();
        assert!(matches!(port, PortError::Transformation { .. }));
    }
}
