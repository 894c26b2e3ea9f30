//! Storage-assigned identifiers.
//!
//! Every aggregate is keyed by a positive 64-bit integer allocated by the
//! database sequence. The newtypes keep pickup point, reception, and item keys
//! from being mixed up at call sites.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation error for identifiers that are not strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} identifier must be positive, got {value}")]
pub struct IdValidationError {
    kind: &'static str,
    value: i64,
}

macro_rules! positive_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Validate and wrap a raw identifier.
            pub const fn new(value: i64) -> Result<Self, IdValidationError> {
                if value <= 0 {
                    return Err(IdValidationError { kind: $kind, value });
                }
                Ok(Self(value))
            }

            /// Raw database value.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = IdValidationError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

positive_id!(
    /// Identifier of a pickup point.
    PickupPointId,
    "pickup point"
);
positive_id!(
    /// Identifier of a reception.
    ReceptionId,
    "reception"
);
positive_id!(
    /// Identifier of a logged item.
    ItemId,
    "item"
);
positive_id!(
    /// Identifier of a registered account.
    AccountId,
    "account"
);
