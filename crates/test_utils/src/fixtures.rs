//! Pre-built Test Fixtures
//!
//! FNOL documents and model completions used across the test suites. The
//! documents read like the text layer of a filled-in ACORD-style loss notice.

/// Fixture for FNOL document text
pub struct FnolTextFixtures;

impl FnolTextFixtures {
    /// A fully filled auto claim with an injured passenger
    pub fn injury_claim() -> &'static str {
        "AUTOMOBILE LOSS NOTICE\n\
         POLICY NUMBER: PA-4471-22  INSURED: Maria Lopez\n\
         EFFECTIVE: 2024-01-01 to 2024-12-31\n\
         DATE OF LOSS: 2024-03-02  TIME: 17:45  LOCATION: 5th Ave & Pine St, Seattle\n\
         DESCRIPTION OF ACCIDENT: Rear-ended at a red light, passenger taken to hospital.\n\
         CLAIMANT: Maria Lopez  THIRD PARTIES: Daniel Kim  CONTACT: maria@example.com\n\
         VEHICLE: Sedan  VIN: 1HGCM82633A004352  ESTIMATE AMOUNT: $5,000\n\
         CLAIM TYPE: Injury  ATTACHMENTS: photos.zip  INITIAL ESTIMATE: $5,000"
    }

    /// A complete claim whose description mentions a staged accident
    pub fn staged_claim() -> &'static str {
        "POLICY NUMBER: PA-9001-11  INSURED: Tom Reed\n\
         DESCRIPTION OF ACCIDENT: Witness says this was a staged accident.\n\
         ESTIMATE AMOUNT: $12,000  CLAIM TYPE: Collision"
    }

    /// The printed form with nothing filled in
    pub fn blank_form() -> &'static str {
        "POLICY NUMBER\nINSURED\nDATE OF LOSS\nTIME OF LOSS\nLOCATION OF LOSS\n\
         DESCRIPTION OF ACCIDENT\nESTIMATE AMOUNT\nATTACHMENTS"
    }
}

/// Fixture for raw model completions
pub struct CompletionFixtures;

impl CompletionFixtures {
    /// Wraps a JSON object the way chatty models answer
    pub fn chatty(json: &str) -> String {
        format!(
            "Sure! Here is the extracted information:\n```json\n{}\n```\nLet me know if you need {{anything}} else.",
            json
        )
    }

    /// The model echoed every label of a blank form
    pub fn label_echo() -> &'static str {
        r#"{
  "Policy Information": {"Policy Number": "POLICY NUMBER", "Policyholder Name": "INSURED", "Effective Dates": "date of effective"},
  "Incident Information": {"Date": "DATE OF LOSS", "Time": "Time of Loss", "Location": "LOCATION OF LOSS", "Description": "DESCRIPTION OF ACCIDENT"},
  "Involved Parties": {"Claimant": "Name of Claimant", "Third Parties": "third parties", "Contact Details": "N/A"},
  "Asset Details": {"Asset Type": "type of asset", "Asset ID": "asset_id", "Estimated Damage": "ESTIMATED DAMAGE"},
  "Other Mandatory Fields": {"Claim Type": "claim_type", "Attachments": "ATTACHMENTS", "Initial Estimate": "null"}
}"#
    }

    /// A completion with no JSON in it
    pub fn refusal() -> &'static str {
        "I'm sorry, but I can't extract information from this document."
    }
}
