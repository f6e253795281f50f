//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! FNOL triage test suite.
//!
//! # Modules
//!
//! - `fixtures`: FNOL documents, model completions and money values
//! - `builders`: Builder for extracted field sets
//! - `assertions`: Assertion helpers for claim records and signals
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;

pub use domain_claims::ports::mock::{ScriptedInference, StaticTextSource};
