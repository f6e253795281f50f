//! JSON recovery from model completions
//!
//! Small instruction-tuned models wrap their JSON in code fences, prepend
//! "Here is the extraction:" or trail off into explanations. Recovery finds
//! the object, parses it strictly, and maps it onto the schema. It never
//! patches broken JSON: a completion either yields an object or fails.

use serde_json::{Map, Value};

use crate::error::FnolError;
use crate::fields::{ExtractedFields, FieldValue};
use crate::schema::ClaimSchema;

/// Extracts the JSON object embedded in a completion
///
/// The first `{` starts the candidate. One JSON value is parsed from there,
/// ignoring whatever follows it; if that fails, the slice up to the last
/// `}` is parsed strictly instead.
///
/// # Errors
///
/// `FnolError::JsonParseFailure` when no brace is present, neither
/// candidate parses, or the parsed value is not an object.
pub fn recover_json(completion: &str) -> Result<Map<String, Value>, FnolError> {
    let start = completion
        .find('{')
        .ok_or_else(|| FnolError::json("no opening brace in completion"))?;
    let candidate = &completion[start..];

    let first_value = serde_json::Deserializer::from_str(candidate)
        .into_iter::<Value>()
        .next();

    let value = match first_value {
        Some(Ok(value)) => value,
        _ => {
            let end = candidate
                .rfind('}')
                .ok_or_else(|| FnolError::json("no closing brace in completion"))?;
            serde_json::from_str::<Value>(&candidate[..=end])
                .map_err(|e| FnolError::json(e.to_string()))?
        }
    };

    match value {
        Value::Object(object) => Ok(object),
        other => Err(FnolError::json(format!(
            "expected an object, found {}",
            json_kind(&other)
        ))),
    }
}

/// Maps a recovered object onto the schema
///
/// Reads `object[category][field]`, falling back to a top-level `field`
/// key when the category is missing. Keys outside the schema are dropped.
pub fn fields_from_json(object: &Map<String, Value>, schema: &ClaimSchema) -> ExtractedFields {
    let mut fields = ExtractedFields::absent(schema);

    for key in schema.fields() {
        let raw = object
            .get(&key.category)
            .and_then(Value::as_object)
            .map(|category| category.get(&key.field))
            .unwrap_or_else(|| object.get(&key.field));

        if let Some(value) = raw.and_then(to_field_value) {
            fields.set(&key, Some(value));
        }
    }

    fields
}

/// Recovers and maps in one step
pub fn recover_fields(completion: &str, schema: &ClaimSchema) -> Result<ExtractedFields, FnolError> {
    let object = recover_json(completion)?;
    Ok(fields_from_json(&object, schema))
}

fn to_field_value(value: &Value) -> Option<FieldValue> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(FieldValue::Text(s.clone())),
        Value::Number(n) => Some(FieldValue::Number(n.clone())),
        Value::Bool(b) => Some(FieldValue::Text(b.to_string())),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(to_field_value)
                .map(|v| v.to_string())
                .filter(|s| !s.trim().is_empty())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(FieldValue::Text(parts.join(", ")))
            }
        }
        Value::Object(_) => Some(FieldValue::Text(value.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{well_known, FieldKey};

    fn lookup<'a>(object: &'a Map<String, Value>, key: &FieldKey) -> Option<&'a Value> {
        object.get(&key.category)?.as_object()?.get(&key.field)
    }

    const BARE: &str = r#"{"Incident Information": {"Date": "2024-03-02", "Description": "Rear-ended at a light"}, "Asset Details": {"Estimated Damage": 5000}}"#;

    #[test]
    fn test_bare_object() {
        let object = recover_json(BARE).unwrap();
        assert!(object.contains_key("Incident Information"));
    }

    #[test]
    fn test_code_fence_and_prose() {
        let wrapped = format!("Here is the extraction:\n```json\n{}\n```\nLet me know if {{anything}} else.", BARE);
        assert_eq!(recover_json(&wrapped).unwrap(), recover_json(BARE).unwrap());
    }

    #[test]
    fn test_trailing_braces_after_object() {
        let text = r#"{"Asset Details": {"Asset ID": "VIN-1"}} and then {not json}"#;
        let object = recover_json(text).unwrap();
        assert_eq!(
            lookup(&object, &FieldKey::new("Asset Details", "Asset ID")),
            Some(&Value::String("VIN-1".to_string()))
        );
    }

    #[test]
    fn test_no_brace_fails() {
        assert!(matches!(
            recover_json("I could not find any fields."),
            Err(FnolError::JsonParseFailure(_))
        ));
    }

    #[test]
    fn test_truncated_object_fails() {
        let truncated = r#"{"Policy Information": {"Policy Number": "PN-1""#;
        assert!(recover_json(truncated).is_err());
    }

    #[test]
    fn test_array_top_level_fails() {
        assert!(recover_json(r#"[{"a": 1}]"#).is_err());
    }

    #[test]
    fn test_mapping_types() {
        let text = r#"{
            "Involved Parties": {"Third Parties": ["Jane Roe", "", null, "City Bus 12"]},
            "Other Mandatory Fields": {"Attachments": [], "Claim Type": true},
            "Asset Details": {"Estimated Damage": 5000.5}
        }"#;
        let fields = recover_fields(text, &ClaimSchema::standard()).unwrap();
        assert_eq!(
            fields.text(&FieldKey::new("Involved Parties", "Third Parties")).as_deref(),
            Some("Jane Roe, City Bus 12")
        );
        assert_eq!(fields.get(&FieldKey::new("Other Mandatory Fields", "Attachments")), None);
        assert_eq!(fields.text(&well_known::claim_type()).as_deref(), Some("true"));
        assert!(matches!(
            fields.get(&well_known::estimated_damage()),
            Some(FieldValue::Number(_))
        ));
    }

    #[test]
    fn test_flat_keys_are_accepted() {
        let text = r#"{"Description": "Hail on roof", "Claim Type": "Property"}"#;
        let fields = recover_fields(text, &ClaimSchema::standard()).unwrap();
        assert_eq!(fields.text(&well_known::description()).as_deref(), Some("Hail on roof"));
        assert_eq!(fields.text(&well_known::claim_type()).as_deref(), Some("Property"));
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let text = r#"{"Incident Information": {"Weather": "rain"}}"#;
        let fields = recover_fields(text, &ClaimSchema::standard()).unwrap();
        assert!(fields.is_all_absent());
    }
}
