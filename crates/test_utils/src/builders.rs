//! Test Data Builders
//!
//! Builds extracted field sets with sensible defaults so tests only spell
//! out the fields they care about.

use domain_claims::schema::well_known;
use domain_claims::{ClaimSchema, ExtractedFields, FieldKey, FieldValue};

/// Builder for `ExtractedFields`
///
/// Starts from a complete, unremarkable collision claim: no fraud words,
/// no injury, damage of $5,000.
pub struct ExtractedFieldsBuilder {
    schema: ClaimSchema,
    fields: ExtractedFields,
}

impl Default for ExtractedFieldsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractedFieldsBuilder {
    /// Creates a builder with every standard field filled in
    pub fn new() -> Self {
        let schema = ClaimSchema::standard();
        let mut fields = ExtractedFields::absent(&schema);
        let defaults: [(&str, &str, FieldValue); 16] = [
            ("Policy Information", "Policy Number", "PA-4471-22".into()),
            ("Policy Information", "Policyholder Name", "Maria Lopez".into()),
            ("Policy Information", "Effective Dates", "2024-01-01 to 2024-12-31".into()),
            ("Incident Information", "Date", "2024-03-02".into()),
            ("Incident Information", "Time", "17:45".into()),
            ("Incident Information", "Location", "5th Ave & Pine St, Seattle".into()),
            ("Incident Information", "Description", "Rear-ended at a red light".into()),
            ("Involved Parties", "Claimant", "Maria Lopez".into()),
            ("Involved Parties", "Third Parties", "Daniel Kim".into()),
            ("Involved Parties", "Contact Details", "maria@example.com".into()),
            ("Asset Details", "Asset Type", "Sedan".into()),
            ("Asset Details", "Asset ID", "1HGCM82633A004352".into()),
            ("Asset Details", "Estimated Damage", FieldValue::from(5000i64)),
            ("Other Mandatory Fields", "Claim Type", "Collision".into()),
            ("Other Mandatory Fields", "Attachments", "photos.zip".into()),
            ("Other Mandatory Fields", "Initial Estimate", "$5,000".into()),
        ];
        for (category, field, value) in defaults {
            fields.set(&FieldKey::new(category, field), Some(value));
        }
        Self { schema, fields }
    }

    /// Sets a field
    pub fn with(mut self, category: &str, field: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.set(&FieldKey::new(category, field), Some(value.into()));
        self
    }

    /// Clears a field
    pub fn without(mut self, category: &str, field: &str) -> Self {
        self.fields.set(&FieldKey::new(category, field), None);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.fields.set(&well_known::description(), Some(description.into()));
        self
    }

    pub fn with_claim_type(mut self, claim_type: &str) -> Self {
        self.fields.set(&well_known::claim_type(), Some(claim_type.into()));
        self
    }

    pub fn with_damage(mut self, damage: impl Into<FieldValue>) -> Self {
        self.fields.set(&well_known::estimated_damage(), Some(damage.into()));
        self
    }

    pub fn schema(&self) -> &ClaimSchema {
        &self.schema
    }

    /// Builds the field set
    pub fn build(self) -> ExtractedFields {
        self.fields
    }

    /// Renders the fields as the JSON object a well-behaved model returns
    pub fn to_completion(&self) -> String {
        serde_json::to_string_pretty(&self.fields).unwrap_or_default()
    }
}
