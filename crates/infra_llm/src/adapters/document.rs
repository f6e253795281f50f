//! Document text source
//!
//! PDFs go through text-layer extraction, one page after another.
//! Everything else is read as UTF-8, replacing invalid bytes. There is no
//! OCR: a scanned PDF yields little or no text.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, PortError};
use domain_claims::{DocumentHandle, DocumentTextSource};

use crate::error::LlmError;

/// Default upper bound on document size
pub const DEFAULT_MAX_BYTES: usize = 20 * 1024 * 1024;

/// Reads files from disk and in-memory uploads
#[derive(Debug, Clone)]
pub struct FileTextSource {
    max_bytes: usize,
}

impl Default for FileTextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTextSource {
    pub fn new() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    pub fn max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn check_size(&self, name: &str, size: usize) -> Result<(), LlmError> {
        if size > self.max_bytes {
            return Err(LlmError::DocumentTooLarge {
                name: name.to_string(),
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    // Sized from metadata so an oversized file is never loaded.
    async fn read_path(&self, path: &Path) -> Result<Vec<u8>, LlmError> {
        let name = path.display().to_string();
        let io_error = |source: std::io::Error| match source.kind() {
            ErrorKind::NotFound => LlmError::DocumentNotFound(name.clone()),
            _ => LlmError::Io {
                name: name.clone(),
                source,
            },
        };

        let size = tokio::fs::metadata(path).await.map_err(&io_error)?.len();
        self.check_size(&name, usize::try_from(size).unwrap_or(usize::MAX))?;
        tokio::fs::read(path).await.map_err(io_error)
    }

    async fn text_of(&self, document: &DocumentHandle) -> Result<String, LlmError> {
        let name = document.name();
        let bytes = match document {
            DocumentHandle::Path(path) => self.read_path(path).await?,
            DocumentHandle::Bytes { data, .. } => {
                self.check_size(&name, data.len())?;
                data.clone()
            }
        };

        if document.is_pdf() {
            pdf_text(name, bytes).await
        } else {
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

async fn pdf_text(name: String, bytes: Vec<u8>) -> Result<String, LlmError> {
    let task_name = name.clone();
    let text = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
            .map(|pages| pages.join("\n"))
            .map_err(|e| LlmError::Pdf {
                name: task_name,
                message: e.to_string(),
            })
    })
    .await
    .map_err(|e| LlmError::Pdf {
        name,
        message: format!("extraction task failed: {}", e),
    })??;

    debug!(chars = text.chars().count(), "PDF text extracted");
    Ok(text)
}

impl DomainPort for FileTextSource {}

#[async_trait]
impl DocumentTextSource for FileTextSource {
    #[instrument(skip(self, document), fields(document = %document.name()))]
    async fn extract_text(&self, document: &DocumentHandle) -> Result<String, PortError> {
        self.text_of(document).await.map_err(PortError::from)
    }
}
