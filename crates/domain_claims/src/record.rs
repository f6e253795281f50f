//! Claim record
//!
//! The audit aggregate produced once per document, and the four-field
//! output record derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, DocumentId, Money};

use crate::completeness::MissingFields;
use crate::fields::ExtractedFields;
use crate::routing::{Route, RouteDecision};
use crate::signals::Signal;

/// How the extraction stage ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// A JSON object was recovered from the completion
    Recovered,
    /// The document had no text, the model was not called
    BlankText,
    TextSourceFailed { reason: String },
    InferenceFailed { reason: String },
    JsonParseFailed { reason: String },
}

impl ExtractionOutcome {
    pub fn is_recovered(&self) -> bool {
        matches!(self, ExtractionOutcome::Recovered)
    }
}

/// The document a record was produced from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: DocumentId,
    pub name: String,
}

/// Verdicts of the three agents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSignals {
    pub investigation: Signal,
    pub injury: Signal,
    pub fast_track: Signal,
}

/// Fully populated result of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct ClaimRecord {
    pub id: ClaimId,
    pub document: Option<DocumentRef>,
    pub processed_at: DateTime<Utc>,
    pub extraction: ExtractionOutcome,
    pub extracted_fields: ExtractedFields,
    pub missing_fields: MissingFields,
    pub signals: ClaimSignals,
    pub estimated_damage: Option<Money>,
    pub decision: RouteDecision,
}

impl ClaimRecord {
    pub fn route(&self) -> Route {
        self.decision.route
    }

    /// The externally visible output record
    pub fn output(&self) -> ClaimOutput<'_> {
        ClaimOutput {
            extracted_fields: &self.extracted_fields,
            missing_fields: &self.missing_fields,
            recommended_route: self.decision.route,
            reasoning: &self.decision.reasoning,
        }
    }
}

/// Output record with exactly four keys
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimOutput<'a> {
    pub extracted_fields: &'a ExtractedFields,
    pub missing_fields: &'a MissingFields,
    pub recommended_route: Route,
    pub reasoning: &'a str,
}
