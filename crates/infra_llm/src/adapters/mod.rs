//! Port adapters
//!
//! Each adapter implements one domain port and translates its own failures
//! into `PortError`.

pub mod disabled;
pub mod document;
pub mod llama_cpp;
pub mod ollama;
pub mod serialized;

pub use disabled::DisabledInference;
pub use document::FileTextSource;
pub use llama_cpp::LlamaCppInference;
pub use ollama::OllamaInference;
pub use serialized::SerializedInference;
