//! Completeness checking

use serde::{Deserialize, Serialize};

use crate::fields::ExtractedFields;
use crate::schema::ClaimSchema;

/// Fully-qualified names of absent mandatory fields, in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissingFields(Vec<String>);

impl MissingFields {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, qualified: &str) -> bool {
        self.0.iter().any(|name| name == qualified)
    }
}

impl FromIterator<String> for MissingFields {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        MissingFields(iter.into_iter().collect())
    }
}

/// Lists every schema field that is absent or blank
pub fn check_completeness(fields: &ExtractedFields, schema: &ClaimSchema) -> MissingFields {
    MissingFields(
        schema
            .fields()
            .filter(|key| fields.get(key).map_or(true, |value| value.is_blank()))
            .map(|key| key.qualified())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldValue;
    use crate::schema::{well_known, FieldKey};

    #[test]
    fn test_all_absent_lists_whole_schema_in_order() {
        let schema = ClaimSchema::standard();
        let missing = check_completeness(&ExtractedFields::absent(&schema), &schema);
        assert_eq!(missing.len(), 16);
        let expected: Vec<String> = schema.fields().map(|k| k.qualified()).collect();
        assert_eq!(missing.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_present_fields_are_not_missing() {
        let schema = ClaimSchema::standard();
        let mut fields = ExtractedFields::absent(&schema);
        fields.set(&well_known::estimated_damage(), Some(FieldValue::from(5000i64)));
        fields.set(&well_known::description(), Some("   ".into()));

        let missing = check_completeness(&fields, &schema);
        assert_eq!(missing.len(), 15);
        assert!(!missing.contains("Asset Details.Estimated Damage"));
        assert!(missing.contains("Incident Information.Description"));
    }

    #[test]
    fn test_custom_schema() {
        let schema = ClaimSchema::new(vec![crate::schema::SchemaCategory::new(
            "Policy Information",
            &["Policy Number"],
        )]);
        let mut fields = ExtractedFields::absent(&schema);
        fields.set(
            &FieldKey::new("Policy Information", "Policy Number"),
            Some("PN-77".into()),
        );
        assert!(check_completeness(&fields, &schema).is_empty());
    }

    #[test]
    fn test_serializes_as_list() {
        let schema = ClaimSchema::standard();
        let missing = check_completeness(&ExtractedFields::absent(&schema), &schema);
        let json = serde_json::to_value(&missing).unwrap();
        assert_eq!(json[0], "Policy Information.Policy Number");
    }
}
