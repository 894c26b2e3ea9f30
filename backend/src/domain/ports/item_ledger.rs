//! Driving port for logging items against the open reception.

use async_trait::async_trait;

use crate::domain::{Item, ItemCategory, LifecycleError, PickupPointId, Principal};

/// Use-case port for the item ledger.
///
/// Both operations fail with `NotFound` (pickup point, reception, or item),
/// `AlreadyClosed`, `Forbidden`, or `Storage`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemLedger: Send + Sync {
    /// Add an item to the pickup point's in-progress reception.
    async fn add_item(
        &self,
        principal: &Principal,
        category: ItemCategory,
        pvz_id: PickupPointId,
    ) -> Result<Item, LifecycleError>;

    /// Remove the most recently attached item and return it.
    async fn remove_last_item(
        &self,
        principal: &Principal,
        pvz_id: PickupPointId,
    ) -> Result<Item, LifecycleError>;
}
