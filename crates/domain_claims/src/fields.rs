//! Extracted claim fields
//!
//! Strictly-typed view of what the extraction stage found for each schema
//! field. Values are either text or a JSON number; `None` is the explicit
//! absent marker. Category and field order always follow the schema.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::{ClaimSchema, FieldKey};

/// A single extracted value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(serde_json::Number),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Returns the text if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }

    /// True for text that is empty after trimming
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Values of one schema category, in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFields {
    name: String,
    values: Vec<(String, Option<FieldValue>)>,
}

impl CategoryFields {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Serialize for CategoryFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in &self.values {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// Mapping from category to field to value-or-absent
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    categories: Vec<CategoryFields>,
}

impl ExtractedFields {
    /// A schema-shaped instance with every field absent
    pub fn absent(schema: &ClaimSchema) -> Self {
        let categories = schema
            .categories()
            .iter()
            .map(|c| CategoryFields {
                name: c.name.clone(),
                values: c.fields.iter().map(|f| (f.clone(), None)).collect(),
            })
            .collect();
        Self { categories }
    }

    pub fn categories(&self) -> &[CategoryFields] {
        &self.categories
    }

    pub fn get(&self, key: &FieldKey) -> Option<&FieldValue> {
        self.categories
            .iter()
            .find(|c| c.name == key.category)?
            .values
            .iter()
            .find(|(f, _)| *f == key.field)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Display text of a present, non-blank value
    pub fn text(&self, key: &FieldKey) -> Option<String> {
        self.get(key)
            .filter(|v| !v.is_blank())
            .map(|v| v.to_string().trim().to_string())
    }

    /// Replaces one value; returns false if the key is not in the schema
    pub fn set(&mut self, key: &FieldKey, value: Option<FieldValue>) -> bool {
        let slot = self
            .categories
            .iter_mut()
            .find(|c| c.name == key.category)
            .and_then(|c| c.values.iter_mut().find(|(f, _)| *f == key.field));

        match slot {
            Some((_, current)) => {
                *current = value;
                true
            }
            None => false,
        }
    }

    /// Iterates `(category, field, value)` in schema order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, Option<&FieldValue>)> + '_ {
        self.categories.iter().flat_map(|c| {
            c.values
                .iter()
                .map(move |(f, v)| (c.name.as_str(), f.as_str(), v.as_ref()))
        })
    }

    pub(crate) fn for_each_mut(&mut self, mut f: impl FnMut(&str, &str, &mut Option<FieldValue>)) {
        for category in &mut self.categories {
            for (field, value) in &mut category.values {
                f(&category.name, field, value);
            }
        }
    }

    pub fn present_count(&self) -> usize {
        self.entries().filter(|(_, _, v)| v.is_some()).count()
    }

    pub fn is_all_absent(&self) -> bool {
        self.present_count() == 0
    }
}

impl Serialize for ExtractedFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, category)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::well_known;

    #[test]
    fn test_absent_instance_matches_schema() {
        let schema = ClaimSchema::standard();
        let fields = ExtractedFields::absent(&schema);
        assert!(fields.is_all_absent());
        assert_eq!(fields.entries().count(), 16);
    }

    #[test]
    fn test_set_and_get() {
        let mut fields = ExtractedFields::absent(&ClaimSchema::standard());
        assert!(fields.set(&well_known::claim_type(), Some("Collision".into())));
        assert_eq!(
            fields.get(&well_known::claim_type()),
            Some(&FieldValue::text("Collision"))
        );
        assert!(!fields.set(&FieldKey::new("Nope", "Nothing"), Some("x".into())));
    }

    #[test]
    fn test_text_renders_numbers_and_skips_blank() {
        let mut fields = ExtractedFields::absent(&ClaimSchema::standard());
        fields.set(&well_known::estimated_damage(), Some(FieldValue::from(5000i64)));
        fields.set(&well_known::description(), Some("   ".into()));
        assert_eq!(fields.text(&well_known::estimated_damage()).as_deref(), Some("5000"));
        assert_eq!(fields.text(&well_known::description()), None);
    }

    #[test]
    fn test_serializes_nested_in_schema_order() {
        let mut fields = ExtractedFields::absent(&ClaimSchema::standard());
        fields.set(&well_known::estimated_damage(), Some(FieldValue::from(5000i64)));

        let json = serde_json::to_string(&fields).unwrap();
        assert!(json.starts_with(r#"{"Policy Information":{"Policy Number":null"#));
        assert!(json.contains(r#""Estimated Damage":5000"#));

        let value = serde_json::to_value(&fields).unwrap();
        assert!(value["Other Mandatory Fields"]["Claim Type"].is_null());
    }
}
