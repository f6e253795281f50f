//! Core Kernel - Foundational types for the FNOL triage system
//!
//! This crate provides the building blocks shared by every other crate:
//! - Money types with precise decimal arithmetic and lenient parsing
//! - Strongly-typed identifiers
//! - Port infrastructure for the external collaborators

pub mod money;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use identifiers::{ClaimId, DocumentId};
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable,
};
