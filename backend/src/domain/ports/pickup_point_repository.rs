//! Port for pickup point persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;

use crate::domain::{City, PickupPoint, PickupPointId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by pickup point repository adapters.
    pub enum PickupPointRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "pickup point repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "pickup point repository query failed: {message}",
    }
}

/// Port for creating and reading pickup points.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PickupPointRepository: Send + Sync {
    /// Insert a pickup point and return it with its assigned identifier.
    async fn create(
        &self,
        city: City,
        registered_at: DateTime<Utc>,
    ) -> Result<PickupPoint, PickupPointRepositoryError>;

    /// Find a pickup point by identifier.
    async fn find_by_id(
        &self,
        id: PickupPointId,
    ) -> Result<Option<PickupPoint>, PickupPointRepositoryError>;

    /// Read one page of pickup points ordered by identifier ascending.
    async fn list_page(
        &self,
        page: PageRequest,
    ) -> Result<Vec<PickupPoint>, PickupPointRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
///
/// `create` echoes back a pickup point with identifier 1; reads find nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePickupPointRepository;

#[async_trait]
impl PickupPointRepository for FixturePickupPointRepository {
    async fn create(
        &self,
        city: City,
        registered_at: DateTime<Utc>,
    ) -> Result<PickupPoint, PickupPointRepositoryError> {
        let id = PickupPointId::new(1)
            .map_err(|err| PickupPointRepositoryError::query(err.to_string()))?;
        Ok(PickupPoint::new(id, city, registered_at))
    }

    async fn find_by_id(
        &self,
        _id: PickupPointId,
    ) -> Result<Option<PickupPoint>, PickupPointRepositoryError> {
        Ok(None)
    }

    async fn list_page(
        &self,
        _page: PageRequest,
    ) -> Result<Vec<PickupPoint>, PickupPointRepositoryError> {
        Ok(Vec::new())
    }
}
