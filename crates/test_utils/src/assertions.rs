//! Custom Test Assertions
//!
//! Assertion helpers for claim records that print the reasoning and
//! signals on failure.

use domain_claims::{ClaimRecord, Route, Signal, SignalSource};

/// Asserts the recommended route of a record
///
/// # Panics
///
/// Panics with the rule, reasoning and signals if the route differs
pub fn assert_route(record: &ClaimRecord, expected: Route) {
    assert_eq!(
        record.route(),
        expected,
        "Unexpected route: rule={}, reasoning={:?}, signals={:?}",
        record.decision.rule,
        record.decision.reasoning,
        record.signals
    );
}

/// Asserts a signal's verdict and source
pub fn assert_signal(signal: &Signal, verdict: bool, source: SignalSource) {
    assert_eq!(
        (signal.verdict(), signal.source()),
        (verdict, source),
        "Unexpected signal: {:?}",
        signal
    );
}

/// Asserts that exactly the given fields are missing, in order
pub fn assert_missing_exactly(record: &ClaimRecord, expected: &[&str]) {
    let actual: Vec<&str> = record.missing_fields.iter().collect();
    assert_eq!(actual, expected, "Missing fields differ");
}

/// Asserts the record has no missing fields
pub fn assert_complete(record: &ClaimRecord) {
    assert!(
        record.missing_fields.is_empty(),
        "Expected a complete claim, missing: {:?}",
        record.missing_fields
    );
}

/// Asserts the output record serializes with exactly the four output keys
pub fn assert_output_shape(record: &ClaimRecord) {
    let value = serde_json::to_value(record.output()).expect("output serializes");
    let object = value.as_object().expect("output is an object");
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["extractedFields", "missingFields", "reasoning", "recommendedRoute"]
    );
}
