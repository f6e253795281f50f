//! Typed identifiers for triage records
//!
//! Both ids wrap a time-ordered UUID (v7) so records sort by creation.
//! They display with a short prefix, `CLM-…` and `DOC-…`, and parse with
//! or without it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! prefixed_id {
    ($(#[$meta:meta])* $name:ident => $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bare = s.trim();
                let bare = bare.strip_prefix(concat!($prefix, "-")).unwrap_or(bare);
                Uuid::parse_str(bare).map(Self)
            }
        }
    };
}

prefixed_id!(
    /// One pipeline run
    ClaimId => "CLM"
);
prefixed_id!(
    /// One submitted document
    DocumentId => "DOC"
);
