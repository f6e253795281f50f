//! Claim schema
//!
//! The ordered catalog of categories and mandatory fields every FNOL
//! document is expected to provide. The schema drives the extraction
//! prompt, the completeness check and the order of the output record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A category of mandatory fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaCategory {
    pub name: String,
    pub fields: Vec<String>,
}

impl SchemaCategory {
    pub fn new(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Reference to one field of the schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldKey {
    pub category: String,
    pub field: String,
}

impl FieldKey {
    pub fn new(category: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            field: field.into(),
        }
    }

    /// Fully-qualified name, e.g. `Incident Information.Description`
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.category, self.field)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category, self.field)
    }
}

/// Immutable, ordered catalog of mandatory claim fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSchema {
    categories: Vec<SchemaCategory>,
}

impl ClaimSchema {
    pub fn new(categories: Vec<SchemaCategory>) -> Self {
        Self { categories }
    }

    /// The sixteen-field schema used for automobile and property loss notices
    pub fn standard() -> Self {
        Self::new(vec![
            SchemaCategory::new(
                "Policy Information",
                &["Policy Number", "Policyholder Name", "Effective Dates"],
            ),
            SchemaCategory::new(
                "Incident Information",
                &["Date", "Time", "Location", "Description"],
            ),
            SchemaCategory::new(
                "Involved Parties",
                &["Claimant", "Third Parties", "Contact Details"],
            ),
            SchemaCategory::new(
                "Asset Details",
                &["Asset Type", "Asset ID", "Estimated Damage"],
            ),
            SchemaCategory::new(
                "Other Mandatory Fields",
                &["Claim Type", "Attachments", "Initial Estimate"],
            ),
        ])
    }

    pub fn categories(&self) -> &[SchemaCategory] {
        &self.categories
    }

    /// All fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.categories.iter().flat_map(|c| {
            c.fields
                .iter()
                .map(move |f| FieldKey::new(c.name.clone(), f.clone()))
        })
    }

    pub fn field_count(&self) -> usize {
        self.categories.iter().map(|c| c.fields.len()).sum()
    }

    pub fn contains(&self, key: &FieldKey) -> bool {
        self.categories
            .iter()
            .any(|c| c.name == key.category && c.fields.iter().any(|f| *f == key.field))
    }
}

impl Default for ClaimSchema {
    fn default() -> Self {
        Self::standard()
    }
}

/// Well-known fields the signal agents read
pub mod well_known {
    use super::FieldKey;

    pub fn description() -> FieldKey {
        FieldKey::new("Incident Information", "Description")
    }

    pub fn claim_type() -> FieldKey {
        FieldKey::new("Other Mandatory Fields", "Claim Type")
    }

    pub fn estimated_damage() -> FieldKey {
        FieldKey::new("Asset Details", "Estimated Damage")
    }
}
