//! Closed failure taxonomy for the reception and item state machine.
//!
//! The reception lifecycle and item ledger ports fail with exactly one of
//! these variants, so callers can match on the outcome exhaustively. Driving
//! adapters convert them into [`Error`] at the edge, with a stable
//! `details.code` tag per variant.

use serde_json::json;
use thiserror::Error as ThisError;

use super::{Error, PickupPointId, ReceptionId, Role};

/// Entity whose absence caused a [`LifecycleError::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingTarget {
    /// No pickup point with this identifier.
    PickupPoint(PickupPointId),
    /// The pickup point has never had a reception.
    Reception(PickupPointId),
    /// The reception has no attached items.
    Item(ReceptionId),
}

impl MissingTarget {
    const fn tag(self) -> &'static str {
        match self {
            Self::PickupPoint(_) => "pickup_point_not_found",
            Self::Reception(_) => "reception_not_found",
            Self::Item(_) => "item_not_found",
        }
    }
}

impl std::fmt::Display for MissingTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PickupPoint(id) => write!(f, "pickup point {id} not found"),
            Self::Reception(id) => write!(f, "pickup point {id} has no reception"),
            Self::Item(id) => write!(f, "reception {id} has no items"),
        }
    }
}

/// Opaque persistence failure, split only by retryability.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum StorageFailure {
    /// Connection or pool failure; the request may be retried.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Adapter-provided detail, logged but never sent to clients.
        message: String,
    },
    /// Query or mutation failure.
    #[error("storage query failed: {message}")]
    Query {
        /// Adapter-provided detail, logged but never sent to clients.
        message: String,
    },
}

/// Failures of the reception and item state machine.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum LifecycleError {
    /// The caller's role may not run this operation.
    #[error("role {role} may not perform this operation")]
    Forbidden {
        /// Role presented by the caller.
        role: Role,
    },
    /// A referenced pickup point, reception, or item is absent.
    #[error("{0}")]
    NotFound(MissingTarget),
    /// A reception is already in progress at the pickup point.
    #[error("pickup point {pvz_id} already has reception {reception_id} in progress")]
    UnclosedReceptionExists {
        /// Pickup point being started.
        pvz_id: PickupPointId,
        /// The reception still in progress.
        reception_id: ReceptionId,
    },
    /// The pickup point's most recent reception is closed, or none exists
    /// when closing.
    #[error("pickup point {pvz_id} has no reception in progress")]
    AlreadyClosed {
        /// Pickup point addressed.
        pvz_id: PickupPointId,
    },
    /// Persistence failed.
    #[error(transparent)]
    Storage(#[from] StorageFailure),
}

impl LifecycleError {
    /// Shorthand for a missing pickup point.
    #[must_use]
    pub const fn pickup_point_not_found(id: PickupPointId) -> Self {
        Self::NotFound(MissingTarget::PickupPoint(id))
    }
}

impl From<LifecycleError> for Error {
    fn from(value: LifecycleError) -> Self {
        let message = value.to_string();
        match value {
            LifecycleError::Forbidden { .. } => Self::forbidden(message),
            LifecycleError::NotFound(target) => {
                Self::not_found(message).with_details(json!({ "code": target.tag() }))
            }
            LifecycleError::UnclosedReceptionExists {
                pvz_id,
                reception_id,
            } => Self::conflict(message).with_details(json!({
                "code": "unclosed_reception_exists",
                "pvzId": pvz_id,
                "receptionId": reception_id,
            })),
            LifecycleError::AlreadyClosed { pvz_id } => Self::conflict(message).with_details(
                json!({ "code": "reception_already_closed", "pvzId": pvz_id }),
            ),
            LifecycleError::Storage(StorageFailure::Unavailable { .. }) => {
                Self::service_unavailable("storage is temporarily unavailable")
            }
            LifecycleError::Storage(StorageFailure::Query { .. }) => Self::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn pvz(raw: i64) -> PickupPointId {
        PickupPointId::new(raw).expect("valid pickup point id")
    }

    fn reception(raw: i64) -> ReceptionId {
        ReceptionId::new(raw).expect("valid reception id")
    }

    #[rstest]
    #[case(
        LifecycleError::pickup_point_not_found(pvz(999)),
        ErrorCode::NotFound,
        "pickup_point_not_found"
    )]
    #[case(
        LifecycleError::NotFound(MissingTarget::Reception(pvz(1))),
        ErrorCode::NotFound,
        "reception_not_found"
    )]
    #[case(
        LifecycleError::NotFound(MissingTarget::Item(reception(3))),
        ErrorCode::NotFound,
        "item_not_found"
    )]
    #[case(
        LifecycleError::UnclosedReceptionExists { pvz_id: pvz(1), reception_id: reception(2) },
        ErrorCode::Conflict,
        "unclosed_reception_exists"
    )]
    #[case(
        LifecycleError::AlreadyClosed { pvz_id: pvz(1) },
        ErrorCode::Conflict,
        "reception_already_closed"
    )]
    fn state_failures_carry_stable_tags(
        #[case] failure: LifecycleError,
        #[case] code: ErrorCode,
        #[case] tag: &str,
    ) {
        let error = Error::from(failure);
        assert_eq!(error.code(), code);
        let details = error.details().expect("tagged details");
        assert_eq!(details.get("code").and_then(|v| v.as_str()), Some(tag));
    }

    #[rstest]
    fn unavailable_storage_hides_adapter_detail() {
        let error = Error::from(LifecycleError::from(StorageFailure::Unavailable {
            message: "pool timed out at 10.0.0.3".to_owned(),
        }));
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        assert!(!error.message().contains("10.0.0.3"));
    }

    #[rstest]
    fn query_failures_are_internal() {
        let error = Error::from(LifecycleError::from(StorageFailure::Query {
            message: "syntax error".to_owned(),
        }));
        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[rstest]
    fn forbidden_roles_map_to_forbidden() {
        let error = Error::from(LifecycleError::Forbidden {
            role: Role::Moderator,
        });
        assert_eq!(error.code(), ErrorCode::Forbidden);
        assert_eq!(error.message(), "role moderator may not perform this operation");
    }

    #[rstest]
    fn messages_name_the_pickup_point() {
        let message = LifecycleError::pickup_point_not_found(pvz(999)).to_string();
        assert_eq!(message, "pickup point 999 not found");
    }
}
