//! Claims DTOs

use serde::Deserialize;
use validator::Validate;

/// Header carrying the id of the processed claim
pub const CLAIM_ID_HEADER: &str = "x-claim-id";

/// Header naming an uploaded document
pub const DOCUMENT_NAME_HEADER: &str = "x-document-name";

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitFnolRequest {
    /// Raw FNOL text; may be empty
    #[validate(length(max = 500_000))]
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TriageQuery {
    /// Return the full audit record instead of the output record
    #[serde(default)]
    pub audit: bool,
}
