//! Field normalization
//!
//! Extraction from a partially filled form often echoes the printed labels
//! back as values ("Policy Number: POLICY NUMBER"). Normalization replaces
//! such artifacts with the absent marker so completeness sees the truth.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::fields::{ExtractedFields, FieldValue};

/// Tokens treated as "no value"
pub const DEFAULT_PLACEHOLDERS: &[&str] = &["n/a", "null", "none", ""];

/// Labels printed on ACORD-style loss notices
pub const DEFAULT_FORM_LABELS: &[&str] = &[
    "policy number",
    "insured",
    "date of loss",
    "time of loss",
    "location of loss",
    "description of accident",
    "description of loss",
    "name of claimant",
    "contact details",
    "type of asset",
    "asset_id",
    "estimated damage",
    "estimate amount",
    "claim_type",
    "insurance claim",
    "insured vehicle",
    "primary e-mail address",
    "secondary e-mail address",
    "other vehicle / property damaged",
    "veh",
    "date of effective",
    "effective start date",
    "effective end date",
    "third parties",
    "attachments",
    "initial estimate",
    "initial_estimate",
    "policy_number",
    "date_of_loss",
];

/// Lower-cases, trims and collapses internal whitespace
pub fn canonical(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Token sets and switches applied by [`normalize`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationRules {
    placeholders: HashSet<String>,
    denylist: HashSet<String>,
    strict_label_heuristics: bool,
}

impl NormalizationRules {
    pub fn new<P, D>(placeholders: P, denylist: D) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self {
            placeholders: placeholders.into_iter().map(|p| canonical(p.as_ref())).collect(),
            denylist: denylist.into_iter().map(|d| canonical(d.as_ref())).collect(),
            strict_label_heuristics: false,
        }
    }

    /// Adds labels on top of the current denylist
    pub fn with_extra_labels<I>(mut self, labels: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.denylist
            .extend(labels.into_iter().map(|l| canonical(l.as_ref())));
        self
    }

    /// Also drop short all-caps values and one-character values
    pub fn with_strict_label_heuristics(mut self, enabled: bool) -> Self {
        self.strict_label_heuristics = enabled;
        self
    }

    pub fn strict_label_heuristics(&self) -> bool {
        self.strict_label_heuristics
    }

    pub fn is_placeholder(&self, text: &str) -> bool {
        self.placeholders.contains(&canonical(text))
    }

    pub fn is_form_label(&self, text: &str) -> bool {
        self.denylist.contains(&canonical(text))
    }

    fn is_artifact(&self, category: &str, field: &str, text: &str) -> bool {
        let value = canonical(text);
        if value.is_empty()
            || value == canonical(field)
            || value == canonical(category)
            || self.placeholders.contains(&value)
            || self.denylist.contains(&value)
        {
            return true;
        }

        self.strict_label_heuristics && looks_like_label(text)
    }
}

impl Default for NormalizationRules {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDERS, DEFAULT_FORM_LABELS)
    }
}

fn looks_like_label(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() < 2 {
        return true;
    }
    let has_letters = trimmed.chars().any(char::is_alphabetic);
    has_letters
        && trimmed == trimmed.to_uppercase()
        && trimmed.split_whitespace().count() <= 3
}

/// Clears label echoes and placeholders, returning the cleaned fields
pub fn normalize(mut fields: ExtractedFields, rules: &NormalizationRules) -> ExtractedFields {
    normalize_in_place(&mut fields, rules);
    fields
}

/// In-place variant of [`normalize`]; returns how many values were cleared
pub fn normalize_in_place(fields: &mut ExtractedFields, rules: &NormalizationRules) -> usize {
    let mut cleared = 0;
    fields.for_each_mut(|category, field, value| {
        let drop = match value {
            Some(FieldValue::Text(text)) => rules.is_artifact(category, field, text),
            Some(FieldValue::Number(_)) | None => false,
        };
        if drop {
            *value = None;
            cleared += 1;
        }
    });
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{well_known, ClaimSchema, FieldKey};

    fn fields_with(key: &FieldKey, value: FieldValue) -> ExtractedFields {
        let mut fields = ExtractedFields::absent(&ClaimSchema::standard());
        fields.set(key, Some(value));
        fields
    }

    #[test]
    fn test_label_echo_is_cleared() {
        let key = FieldKey::new("Policy Information", "Policy Number");
        let fields = normalize(
            fields_with(&key, "  POLICY   number ".into()),
            &NormalizationRules::default(),
        );
        assert_eq!(fields.get(&key), None);
    }

    #[test]
    fn test_category_label_is_cleared() {
        let key = FieldKey::new("Involved Parties", "Claimant");
        let fields = normalize(
            fields_with(&key, "Involved Parties".into()),
            &NormalizationRules::default(),
        );
        assert_eq!(fields.get(&key), None);
    }

    #[test]
    fn test_placeholders_and_form_labels() {
        let rules = NormalizationRules::default();
        assert!(rules.is_placeholder(" N/A "));
        assert!(rules.is_placeholder("None"));
        assert!(rules.is_form_label("Description of  Accident"));
        assert!(!rules.is_form_label("Rear-ended at a stop light"));
    }

    #[test]
    fn test_real_values_survive() {
        let fields = normalize(
            fields_with(&well_known::description(), "Rear-ended at a stop light".into()),
            &NormalizationRules::default(),
        );
        assert!(fields.get(&well_known::description()).is_some());
    }

    #[test]
    fn test_numbers_are_never_artifacts() {
        let fields = normalize(
            fields_with(&well_known::estimated_damage(), FieldValue::from(0i64)),
            &NormalizationRules::default().with_strict_label_heuristics(true),
        );
        assert_eq!(fields.get(&well_known::estimated_damage()), Some(&FieldValue::from(0i64)));
    }

    #[test]
    fn test_strict_heuristics_are_opt_in() {
        let key = FieldKey::new("Asset Details", "Asset Type");
        let lenient = normalize(fields_with(&key, "VIN".into()), &NormalizationRules::default());
        assert!(lenient.get(&key).is_some());

        let strict = normalize(
            fields_with(&key, "VIN".into()),
            &NormalizationRules::default().with_strict_label_heuristics(true),
        );
        assert_eq!(strict.get(&key), None);
    }

    #[test]
    fn test_extra_labels() {
        let key = FieldKey::new("Asset Details", "Asset ID");
        let rules = NormalizationRules::default().with_extra_labels(["Serial / VIN"]);
        let fields = normalize(fields_with(&key, "serial / vin".into()), &rules);
        assert_eq!(fields.get(&key), None);
    }

    #[test]
    fn test_cleared_count() {
        let mut fields = ExtractedFields::absent(&ClaimSchema::standard());
        fields.set(&well_known::claim_type(), Some("Claim Type".into()));
        fields.set(&well_known::description(), Some("n/a".into()));
        fields.set(&FieldKey::new("Incident Information", "Location"), Some("Main St".into()));
        assert_eq!(normalize_in_place(&mut fields, &NormalizationRules::default()), 2);
        assert_eq!(fields.present_count(), 1);
    }
}
