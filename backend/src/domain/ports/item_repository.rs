//! Port for item persistence and the reception association.
//!
//! Items are created first and attached to a reception in a separate step.
//! The association carries its own sequence, and "last item" means the most
//! recently attached one rather than the most recently created.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Item, ItemCategory, ItemId, ReceptionId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by item repository adapters.
    pub enum ItemRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "item repository query failed: {message}",
    }
}

/// Port for creating, attaching, and removing items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert an item record and return its identifier.
    async fn create(
        &self,
        category: &ItemCategory,
        added_at: DateTime<Utc>,
    ) -> Result<ItemId, ItemRepositoryError>;

    /// Attach an existing item to a reception.
    async fn attach(&self, reception_id: ReceptionId, item_id: ItemId)
    -> Result<(), ItemRepositoryError>;

    /// Atomically detach and delete the most recently attached item.
    ///
    /// Returns `None` when the reception has no items.
    async fn detach_last(
        &self,
        reception_id: ReceptionId,
    ) -> Result<Option<Item>, ItemRepositoryError>;

    /// Items attached to any of the receptions, in attachment order.
    async fn list_for_receptions(
        &self,
        reception_ids: &[ReceptionId],
    ) -> Result<Vec<Item>, ItemRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureItemRepository;

#[async_trait]
impl ItemRepository for FixtureItemRepository {
    async fn create(
        &self,
        _category: &ItemCategory,
        _added_at: DateTime<Utc>,
    ) -> Result<ItemId, ItemRepositoryError> {
        ItemId::new(1).map_err(|err| ItemRepositoryError::query(err.to_string()))
    }

    async fn attach(
        &self,
        _reception_id: ReceptionId,
        _item_id: ItemId,
    ) -> Result<(), ItemRepositoryError> {
        Ok(())
    }

    async fn detach_last(
        &self,
        _reception_id: ReceptionId,
    ) -> Result<Option<Item>, ItemRepositoryError> {
        Ok(None)
    }

    async fn list_for_receptions(
        &self,
        _reception_ids: &[ReceptionId],
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_detach_finds_nothing() {
        let reception = ReceptionId::new(3).expect("valid id");
        let removed = FixtureItemRepository
            .detach_last(reception)
            .await
            .expect("fixture detach succeeds");
        assert!(removed.is_none());
    }
}
