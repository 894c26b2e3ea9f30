//! Driving port for opening and browsing pickup points.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{
    City, Error, PickupPoint, PickupPointId, PickupPointOverview, Principal, ReceptionWindow,
};

/// Use-case port for the pickup point directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PickupPointDirectory: Send + Sync {
    /// Open a pickup point in `city`. Moderators only.
    async fn open(&self, principal: &Principal, city: City) -> Result<PickupPoint, Error>;

    /// Look up a pickup point, failing with `not_found` when absent.
    async fn get(&self, id: PickupPointId) -> Result<PickupPoint, Error>;

    /// One page of pickup points with their receptions inside `window`.
    ///
    /// Pickup points without matching receptions are included with an empty
    /// reception list.
    async fn list_with_receptions(
        &self,
        principal: &Principal,
        window: ReceptionWindow,
        page: PageRequest,
    ) -> Result<Vec<PickupPointOverview>, Error>;
}
