//! Shared classification of pool and Diesel failures.
//!
//! Each repository turns a [`DieselFailure`] into its own port error. Only
//! unique violations carry extra meaning; the adapter decides which
//! constraint it expected.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Storage failure reduced to what the ports distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// Connection lost, refused, or unavailable from the pool.
    Connection(String),
    /// Any other query failure.
    Query(String),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
}

impl DieselFailure {
    /// Fold into the port's connection and query constructors, treating a
    /// unique violation as a query failure.
    pub(crate) fn into_port<E>(
        self,
        connection: impl FnOnce(String) -> E,
        query: impl FnOnce(String) -> E,
    ) -> E {
        match self {
            Self::Connection(message) => connection(message),
            Self::Query(message) => query(message),
            Self::UniqueViolation { constraint } => query(format!(
                "unique constraint {} violated",
                constraint.as_deref().unwrap_or("<unnamed>")
            )),
        }
    }

    /// Whether this is a violation of `constraint`.
    pub(crate) fn violates(&self, constraint: &str) -> bool {
        matches!(self, Self::UniqueViolation { constraint: Some(name) } if name == constraint)
    }
}

impl From<PoolError> for DieselFailure {
    fn from(error: PoolError) -> Self {
        Self::Connection(error.into_message())
    }
}

impl From<DieselError> for DieselFailure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
            }
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                "diesel operation failed"
            ),
        }

        match error {
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation {
                    constraint: info.constraint_name().map(str::to_owned),
                }
            }
            DieselError::DatabaseError(
                DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand,
                _,
            ) => Self::Connection("database connection error".to_owned()),
            DieselError::DatabaseError(_, _) => Self::Query("database error".to_owned()),
            _ => Self::Query("database error".to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("boom".to_owned()))
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::ClosedConnection), true)]
    #[case(database_error(DatabaseErrorKind::UnableToSendCommand), true)]
    #[case(database_error(DatabaseErrorKind::CheckViolation), false)]
    #[case(DieselError::NotFound, false)]
    fn connection_failures_are_recognised(#[case] error: DieselError, #[case] connection: bool) {
        let failure = DieselFailure::from(error);
        assert_eq!(matches!(failure, DieselFailure::Connection(_)), connection);
    }

    #[rstest]
    fn unique_violation_without_constraint_name_matches_nothing() {
        let failure = DieselFailure::from(database_error(DatabaseErrorKind::UniqueViolation));
        assert_eq!(failure, DieselFailure::UniqueViolation { constraint: None });
        assert!(!failure.violates("users_email_key"));
    }

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let failure = DieselFailure::from(PoolError::checkout("timed out"));
        assert_eq!(failure, DieselFailure::Connection("timed out".to_owned()));
    }

    #[rstest]
    fn into_port_routes_by_variant() {
        let routed: Result<(), String> = Err(DieselFailure::Query("bad".to_owned())
            .into_port(|m| format!("conn:{m}"), |m| format!("query:{m}")));
        assert_eq!(routed, Err("query:bad".to_owned()));
    }
}
