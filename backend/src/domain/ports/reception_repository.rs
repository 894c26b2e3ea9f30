//! Port for reception persistence.
//!
//! [`ReceptionRepository::latest_for_pickup_point`] is the single definition of
//! "most recent reception": latest start time, ties broken by the highest
//! identifier. Every lifecycle and ledger path reads through it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{PickupPointId, Reception, ReceptionId, ReceptionWindow};

use super::define_port_error;

define_port_error! {
    /// Errors raised by reception repository adapters.
    pub enum ReceptionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "reception repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "reception repository query failed: {message}",
        /// Storage refused a second in-progress reception for the pickup point.
        ActiveReceptionExists { pvz_id: PickupPointId } =>
            "pickup point {pvz_id} already has a reception in progress",
    }
}

/// Port for creating, closing, and reading receptions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReceptionRepository: Send + Sync {
    /// The most recent reception at a pickup point, if any.
    async fn latest_for_pickup_point(
        &self,
        pvz_id: PickupPointId,
    ) -> Result<Option<Reception>, ReceptionRepositoryError>;

    /// Insert an in-progress reception.
    ///
    /// Adapters backed by a uniqueness constraint report a concurrent
    /// in-progress reception as `ActiveReceptionExists`.
    async fn create(
        &self,
        pvz_id: PickupPointId,
        started_at: DateTime<Utc>,
    ) -> Result<Reception, ReceptionRepositoryError>;

    /// Close a reception that is still in progress.
    ///
    /// Returns `None` when the reception was not in progress.
    async fn close(&self, id: ReceptionId)
    -> Result<Option<Reception>, ReceptionRepositoryError>;

    /// Receptions of the given pickup points within `window`, most recent
    /// first per pickup point.
    async fn list_for_pickup_points(
        &self,
        pvz_ids: &[PickupPointId],
        window: ReceptionWindow,
    ) -> Result<Vec<Reception>, ReceptionRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
///
/// No reception ever exists; `create` returns reception 1 and `close` finds
/// nothing to close.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReceptionRepository;

#[async_trait]
impl ReceptionRepository for FixtureReceptionRepository {
    async fn latest_for_pickup_point(
        &self,
        _pvz_id: PickupPointId,
    ) -> Result<Option<Reception>, ReceptionRepositoryError> {
        Ok(None)
    }

    async fn create(
        &self,
        pvz_id: PickupPointId,
        started_at: DateTime<Utc>,
    ) -> Result<Reception, ReceptionRepositoryError> {
        let id =
            ReceptionId::new(1).map_err(|err| ReceptionRepositoryError::query(err.to_string()))?;
        Ok(Reception::new(
            id,
            pvz_id,
            started_at,
            crate::domain::ReceptionStatus::InProgress,
        ))
    }

    async fn close(
        &self,
        _id: ReceptionId,
    ) -> Result<Option<Reception>, ReceptionRepositoryError> {
        Ok(None)
    }

    async fn list_for_pickup_points(
        &self,
        _pvz_ids: &[PickupPointId],
        _window: ReceptionWindow,
    ) -> Result<Vec<Reception>, ReceptionRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn active_reception_error_names_pickup_point() {
        let pvz = PickupPointId::new(4).expect("valid id");
        assert_eq!(
            ReceptionRepositoryError::active_reception_exists(pvz).to_string(),
            "pickup point 4 already has a reception in progress"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_has_no_latest_reception() {
        let pvz = PickupPointId::new(4).expect("valid id");
        let latest = FixtureReceptionRepository
            .latest_for_pickup_point(pvz)
            .await
            .expect("fixture lookup succeeds");
        assert!(latest.is_none());
    }
}
