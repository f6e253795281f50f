//! Property-Based Test Generators
//!
//! Provides proptest strategies for field values, whole field sets, noisy
//! completion wrappers and routing inputs.

use domain_claims::normalize::{DEFAULT_FORM_LABELS, DEFAULT_PLACEHOLDERS};
use domain_claims::{ClaimSchema, ExtractedFields, FieldValue, MissingFields, Signal};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for plausible filled-in values
pub fn real_text_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 .,'-]{1,30}"
}

/// Strategy for label artifacts and placeholders, with random casing and padding
pub fn artifact_strategy() -> impl Strategy<Value = String> {
    let tokens: Vec<&'static str> = DEFAULT_FORM_LABELS
        .iter()
        .chain(DEFAULT_PLACEHOLDERS.iter())
        .copied()
        .collect();
    (prop::sample::select(tokens), any::<bool>(), 0usize..3).prop_map(|(token, upper, pad)| {
        let token = if upper {
            token.to_uppercase()
        } else {
            token.to_string()
        };
        format!("{}{}{}", " ".repeat(pad), token, " ".repeat(pad))
    })
}

/// Strategy for any single value a model might emit
pub fn field_value_strategy() -> impl Strategy<Value = Option<FieldValue>> {
    prop_oneof![
        2 => Just(None),
        4 => real_text_strategy().prop_map(|s| Some(FieldValue::Text(s))),
        3 => artifact_strategy().prop_map(|s| Some(FieldValue::Text(s))),
        1 => (0i64..1_000_000i64).prop_map(|n| Some(FieldValue::from(n))),
    ]
}

/// Strategy for a standard-schema field set with mixed values
pub fn extracted_fields_strategy() -> impl Strategy<Value = ExtractedFields> {
    let schema = ClaimSchema::standard();
    let count = schema.field_count();
    prop::collection::vec(field_value_strategy(), count).prop_map(move |values| {
        let mut fields = ExtractedFields::absent(&schema);
        for (key, value) in schema.fields().zip(values) {
            fields.set(&key, value);
        }
        fields
    })
}

/// Strategy for prose placed around a JSON object, never containing braces
pub fn prose_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("Here is the JSON:\n".to_string()),
        Just("```json\n".to_string()),
        "[A-Za-z .:\n]{0,40}",
    ]
}

/// Strategy for signals from either source
pub fn signal_strategy() -> impl Strategy<Value = Signal> {
    (any::<bool>(), any::<bool>()).prop_map(|(verdict, from_model)| {
        if from_model {
            Signal::from_model(verdict, if verdict { "yes" } else { "no" })
        } else {
            Signal::from_fallback(verdict, None)
        }
    })
}

/// Strategy for a subset of the standard schema's field names, in order
pub fn missing_fields_strategy() -> impl Strategy<Value = MissingFields> {
    let names: Vec<String> = ClaimSchema::standard().fields().map(|k| k.qualified()).collect();
    prop::collection::vec(any::<bool>(), names.len()).prop_map(move |mask| {
        names
            .iter()
            .zip(mask)
            .filter(|(_, keep)| *keep)
            .map(|(name, _)| name.clone())
            .collect()
    })
}

/// Strategy for two-decimal damage amounts around the default threshold
pub fn damage_amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..5_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}
