//! Claims Triage Domain
//!
//! This crate turns the raw text of a First Notice of Loss (FNOL) into a
//! routing decision with a justification.
//!
//! # Pipeline
//!
//! ```text
//! text -> extraction prompt -> completion -> JSON recovery -> normalization
//!      -> completeness + {investigation, injury, fast-track} signals
//!      -> routing -> ClaimRecord
//! ```
//!
//! The model is treated as unreliable. Each signal has a deterministic
//! fallback, and any failure before routing leaves every field absent so
//! the claim lands in manual review.
//!
//! # Examples
//!
//! ```rust
//! use domain_claims::{check_completeness, normalize, recover_fields};
//! use domain_claims::{ClaimSchema, NormalizationRules};
//!
//! let schema = ClaimSchema::standard();
//! let completion = r#"Sure! {"Policy Information": {"Policy Number": "POLICY NUMBER"}}"#;
//!
//! let fields = recover_fields(completion, &schema).unwrap();
//! let fields = normalize(fields, &NormalizationRules::default());
//!
//! // The echoed label is not a value
//! assert_eq!(check_completeness(&fields, &schema).len(), 16);
//! ```

pub mod schema;
pub mod fields;
pub mod recovery;
pub mod normalize;
pub mod completeness;
pub mod prompt;
pub mod signals;
pub mod routing;
pub mod record;
pub mod config;
pub mod ports;
pub mod pipeline;
pub mod error;

pub use schema::{ClaimSchema, FieldKey, SchemaCategory};
pub use fields::{ExtractedFields, FieldValue};
pub use recovery::{recover_fields, recover_json};
pub use normalize::{normalize, NormalizationRules};
pub use completeness::{check_completeness, MissingFields};
pub use prompt::PromptKind;
pub use signals::{Signal, SignalAgent, SignalSource};
pub use routing::{decide_route, Route, RouteDecision, RoutingInput};
pub use record::{ClaimOutput, ClaimRecord, ExtractionOutcome};
pub use config::PipelineConfig;
pub use ports::{DocumentHandle, DocumentTextSource, InferenceParams, InferenceService};
pub use pipeline::ClaimPipeline;
pub use error::FnolError;
