//! Item ledger: logging items against the open reception and undoing them in
//! reverse order.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use super::lifecycle_support::{
    log_failure, require_open_reception, require_pickup_point, require_role,
};
use super::ports::{
    DomainMetrics, ItemLedger, ItemRepository, NoOpDomainMetrics, PickupPointRepository,
    ReceptionRepository,
};
use super::{
    Item, ItemCategory, LifecycleError, MissingTarget, PickupPointId, PickupPointLocks,
    Principal, Role,
};

/// Implementation of [`ItemLedger`].
pub struct ItemLedgerService<P, R, I, M = NoOpDomainMetrics> {
    pickup_points: Arc<P>,
    receptions: Arc<R>,
    items: Arc<I>,
    locks: PickupPointLocks,
    metrics: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<P, R, I> ItemLedgerService<P, R, I, NoOpDomainMetrics> {
    /// Create a ledger that discards metrics.
    pub fn with_noop_metrics(
        pickup_points: Arc<P>,
        receptions: Arc<R>,
        items: Arc<I>,
        locks: PickupPointLocks,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(
            pickup_points,
            receptions,
            items,
            locks,
            Arc::new(NoOpDomainMetrics),
            clock,
        )
    }
}

impl<P, R, I, M> ItemLedgerService<P, R, I, M> {
    /// Create a ledger sharing `locks` with the reception lifecycle.
    pub fn new(
        pickup_points: Arc<P>,
        receptions: Arc<R>,
        items: Arc<I>,
        locks: PickupPointLocks,
        metrics: Arc<M>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            pickup_points,
            receptions,
            items,
            locks,
            metrics,
            clock,
        }
    }
}

impl<P, R, I, M> ItemLedgerService<P, R, I, M>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
    I: ItemRepository,
    M: DomainMetrics,
{
    async fn add(
        &self,
        category: ItemCategory,
        pvz_id: PickupPointId,
    ) -> Result<Item, LifecycleError> {
        require_pickup_point(self.pickup_points.as_ref(), pvz_id).await?;
        let _guard = self.locks.acquire(pvz_id).await;
        let reception = require_open_reception(self.receptions.as_ref(), pvz_id).await?;

        let added_at = self.clock.utc();
        let item_id = self.items.create(&category, added_at).await?;
        if let Err(err) = self.items.attach(reception.id(), item_id).await {
            // The item record stays behind without an association.
            warn!(
                pvz_id = %pvz_id,
                reception_id = %reception.id(),
                item_id = %item_id,
                error = %err,
                "item created but not attached"
            );
            return Err(err.into());
        }

        Ok(Item::new(item_id, reception.id(), category, added_at))
    }

    async fn remove_last(&self, pvz_id: PickupPointId) -> Result<Item, LifecycleError> {
        require_pickup_point(self.pickup_points.as_ref(), pvz_id).await?;
        let _guard = self.locks.acquire(pvz_id).await;
        let reception = require_open_reception(self.receptions.as_ref(), pvz_id).await?;

        self.items
            .detach_last(reception.id())
            .await?
            .ok_or(LifecycleError::NotFound(MissingTarget::Item(reception.id())))
    }
}

#[async_trait]
impl<P, R, I, M> ItemLedger for ItemLedgerService<P, R, I, M>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
    I: ItemRepository,
    M: DomainMetrics,
{
    async fn add_item(
        &self,
        principal: &Principal,
        category: ItemCategory,
        pvz_id: PickupPointId,
    ) -> Result<Item, LifecycleError> {
        require_role(principal, &[Role::Employee])?;
        let item = self
            .add(category, pvz_id)
            .await
            .inspect_err(|err| log_failure("add_item", err))?;
        let _ = self.metrics.record_item_added().await;
        info!(
            pvz_id = %pvz_id,
            reception_id = %item.reception_id(),
            item_id = %item.id(),
            category = %item.category(),
            "item added"
        );
        Ok(item)
    }

    async fn remove_last_item(
        &self,
        principal: &Principal,
        pvz_id: PickupPointId,
    ) -> Result<Item, LifecycleError> {
        require_role(principal, &[Role::Employee])?;
        let item = self
            .remove_last(pvz_id)
            .await
            .inspect_err(|err| log_failure("remove_last_item", err))?;
        info!(
            pvz_id = %pvz_id,
            reception_id = %item.reception_id(),
            item_id = %item.id(),
            "item removed"
        );
        Ok(item)
    }
}

#[cfg(test)]
#[path = "item_ledger_service_tests.rs"]
mod tests;
