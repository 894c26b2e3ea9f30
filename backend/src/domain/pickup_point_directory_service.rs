//! Pickup point directory: opening pickup points and the overview listing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::PageRequest;
use tracing::{debug, info};

use super::lifecycle_support::{log_failure, require_pickup_point};
use super::ports::{
    DomainMetrics, ItemRepository, NoOpDomainMetrics, PickupPointDirectory,
    PickupPointRepository, ReceptionRepository,
};
use super::{
    City, Error, Item, LifecycleError, PickupPoint, PickupPointId, PickupPointOverview, Principal,
    ReceptionId, ReceptionOverview, ReceptionWindow, Role,
};

/// Implementation of [`PickupPointDirectory`].
pub struct PickupPointDirectoryService<P, R, I, M = NoOpDomainMetrics> {
    pickup_points: Arc<P>,
    receptions: Arc<R>,
    items: Arc<I>,
    metrics: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<P, R, I> PickupPointDirectoryService<P, R, I, NoOpDomainMetrics> {
    /// Create a directory that discards metrics.
    pub fn with_noop_metrics(
        pickup_points: Arc<P>,
        receptions: Arc<R>,
        items: Arc<I>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(
            pickup_points,
            receptions,
            items,
            Arc::new(NoOpDomainMetrics),
            clock,
        )
    }
}

impl<P, R, I, M> PickupPointDirectoryService<P, R, I, M> {
    /// Create a directory.
    pub fn new(
        pickup_points: Arc<P>,
        receptions: Arc<R>,
        items: Arc<I>,
        metrics: Arc<M>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            pickup_points,
            receptions,
            items,
            metrics,
            clock,
        }
    }
}

impl<P, R, I, M> PickupPointDirectoryService<P, R, I, M>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
    I: ItemRepository,
    M: DomainMetrics,
{
    async fn overview(
        &self,
        window: ReceptionWindow,
        page: PageRequest,
    ) -> Result<Vec<PickupPointOverview>, LifecycleError> {
        let pickup_points = self.pickup_points.list_page(page).await?;
        if pickup_points.is_empty() {
            return Ok(Vec::new());
        }

        let pvz_ids: Vec<PickupPointId> = pickup_points.iter().map(PickupPoint::id).collect();
        let mut receptions = self
            .receptions
            .list_for_pickup_points(&pvz_ids, window)
            .await?;
        receptions.sort_by(|a, b| {
            b.started_at()
                .cmp(&a.started_at())
                .then(b.id().cmp(&a.id()))
        });

        let reception_ids: Vec<ReceptionId> = receptions.iter().map(|r| r.id()).collect();
        let items = if reception_ids.is_empty() {
            Vec::new()
        } else {
            self.items.list_for_receptions(&reception_ids).await?
        };

        let mut items_by_reception: HashMap<ReceptionId, Vec<Item>> = HashMap::new();
        for item in items {
            items_by_reception
                .entry(item.reception_id())
                .or_default()
                .push(item);
        }

        let mut receptions_by_pvz: HashMap<PickupPointId, Vec<ReceptionOverview>> =
            HashMap::new();
        for reception in receptions {
            let items = items_by_reception
                .remove(&reception.id())
                .unwrap_or_default();
            receptions_by_pvz
                .entry(reception.pickup_point_id())
                .or_default()
                .push(ReceptionOverview { reception, items });
        }

        debug!(
            page = page.page(),
            limit = page.limit(),
            pickup_points = pickup_points.len(),
            "pickup point overview assembled"
        );

        Ok(pickup_points
            .into_iter()
            .map(|pickup_point| PickupPointOverview {
                receptions: receptions_by_pvz
                    .remove(&pickup_point.id())
                    .unwrap_or_default(),
                pickup_point,
            })
            .collect())
    }
}

#[async_trait]
impl<P, R, I, M> PickupPointDirectory for PickupPointDirectoryService<P, R, I, M>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
    I: ItemRepository,
    M: DomainMetrics,
{
    async fn open(&self, principal: &Principal, city: City) -> Result<PickupPoint, Error> {
        principal.require_any(&[Role::Moderator])?;
        let pickup_point = self
            .pickup_points
            .create(city, self.clock.utc())
            .await
            .map_err(LifecycleError::from)
            .inspect_err(|err| log_failure("open_pickup_point", err))?;
        let _ = self.metrics.record_pickup_point_opened(city).await;
        info!(
            pvz_id = %pickup_point.id(),
            city = %city,
            subject = principal.subject(),
            "pickup point opened"
        );
        Ok(pickup_point)
    }

    async fn get(&self, id: PickupPointId) -> Result<PickupPoint, Error> {
        let pickup_point = require_pickup_point(self.pickup_points.as_ref(), id)
            .await
            .inspect_err(|err| log_failure("get_pickup_point", err))?;
        Ok(pickup_point)
    }

    async fn list_with_receptions(
        &self,
        principal: &Principal,
        window: ReceptionWindow,
        page: PageRequest,
    ) -> Result<Vec<PickupPointOverview>, Error> {
        principal.require_any(&[Role::Employee, Role::Moderator])?;
        let overview = self
            .overview(window, page)
            .await
            .inspect_err(|err| log_failure("list_pickup_points", err))?;
        Ok(overview)
    }
}

#[cfg(test)]
#[path = "pickup_point_directory_service_tests.rs"]
mod tests;
