//! Reception state machine.
//!
//! Per pickup point the state is the status of its most recent reception, or
//! "no reception" if none was ever started:
//!
//! ```text
//! no-reception --start--> in_progress --close--> closed --start--> in_progress ...
//! ```
//!
//! Both transitions read the latest reception and then write, so each holds
//! the pickup point's guard from [`PickupPointLocks`] across the sequence. The
//! storage layer's uniqueness rule is a second line of defence for writers in
//! other processes.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::lifecycle_support::{log_failure, require_pickup_point, require_role};
use super::ports::{
    DomainMetrics, NoOpDomainMetrics, PickupPointRepository, ReceptionLifecycle,
    ReceptionRepository, ReceptionRepositoryError,
};
use super::{
    LifecycleError, PickupPointId, PickupPointLocks, Principal, Reception, Role, StorageFailure,
};

/// Implementation of [`ReceptionLifecycle`].
pub struct ReceptionLifecycleService<P, R, M = NoOpDomainMetrics> {
    pickup_points: Arc<P>,
    receptions: Arc<R>,
    locks: PickupPointLocks,
    metrics: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<P, R> ReceptionLifecycleService<P, R, NoOpDomainMetrics> {
    /// Create a service that discards metrics.
    pub fn with_noop_metrics(
        pickup_points: Arc<P>,
        receptions: Arc<R>,
        locks: PickupPointLocks,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(
            pickup_points,
            receptions,
            locks,
            Arc::new(NoOpDomainMetrics),
            clock,
        )
    }
}

impl<P, R, M> ReceptionLifecycleService<P, R, M> {
    /// Create a service.
    ///
    /// `locks` must be the registry shared with the item ledger so both
    /// serialise on the same pickup point.
    pub fn new(
        pickup_points: Arc<P>,
        receptions: Arc<R>,
        locks: PickupPointLocks,
        metrics: Arc<M>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            pickup_points,
            receptions,
            locks,
            metrics,
            clock,
        }
    }
}

impl<P, R, M> ReceptionLifecycleService<P, R, M>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
    M: DomainMetrics,
{
    async fn start_reception(&self, pvz_id: PickupPointId) -> Result<Reception, LifecycleError> {
        require_pickup_point(self.pickup_points.as_ref(), pvz_id).await?;
        let _guard = self.locks.acquire(pvz_id).await;

        if let Some(latest) = self.receptions.latest_for_pickup_point(pvz_id).await? {
            if latest.is_open() {
                return Err(LifecycleError::UnclosedReceptionExists {
                    pvz_id,
                    reception_id: latest.id(),
                });
            }
        }

        match self.receptions.create(pvz_id, self.clock.utc()).await {
            Ok(reception) => Ok(reception),
            Err(ReceptionRepositoryError::ActiveReceptionExists { .. }) => {
                // Another process won the race; report the reception it created.
                match self.receptions.latest_for_pickup_point(pvz_id).await? {
                    Some(winner) if winner.is_open() => {
                        Err(LifecycleError::UnclosedReceptionExists {
                            pvz_id,
                            reception_id: winner.id(),
                        })
                    }
                    _ => Err(StorageFailure::Query {
                        message: format!(
                            "active reception conflict at pickup point {pvz_id} but none in progress"
                        ),
                    }
                    .into()),
                }
            }
            Err(other) => Err(other.into()),
        }
    }

    async fn close_reception(&self, pvz_id: PickupPointId) -> Result<Reception, LifecycleError> {
        require_pickup_point(self.pickup_points.as_ref(), pvz_id).await?;
        let _guard = self.locks.acquire(pvz_id).await;

        let latest = self
            .receptions
            .latest_for_pickup_point(pvz_id)
            .await?
            .filter(Reception::is_open)
            .ok_or(LifecycleError::AlreadyClosed { pvz_id })?;

        self.receptions
            .close(latest.id())
            .await?
            .ok_or(LifecycleError::AlreadyClosed { pvz_id })
    }
}

#[async_trait]
impl<P, R, M> ReceptionLifecycle for ReceptionLifecycleService<P, R, M>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
    M: DomainMetrics,
{
    async fn start(
        &self,
        principal: &Principal,
        pvz_id: PickupPointId,
    ) -> Result<Reception, LifecycleError> {
        require_role(principal, &[Role::Employee])?;
        let reception = self.start_reception(pvz_id).await.inspect_err(|err| {
            log_failure("start_reception", err);
        })?;
        let _ = self.metrics.record_reception_started().await;
        info!(
            pvz_id = %pvz_id,
            reception_id = %reception.id(),
            subject = principal.subject(),
            "reception started"
        );
        Ok(reception)
    }

    async fn close(
        &self,
        principal: &Principal,
        pvz_id: PickupPointId,
    ) -> Result<Reception, LifecycleError> {
        require_role(principal, &[Role::Employee])?;
        let reception = self.close_reception(pvz_id).await.inspect_err(|err| {
            log_failure("close_reception", err);
        })?;
        info!(
            pvz_id = %pvz_id,
            reception_id = %reception.id(),
            subject = principal.subject(),
            "reception closed"
        );
        Ok(reception)
    }
}

#[cfg(test)]
#[path = "reception_lifecycle_service_tests.rs"]
mod tests;
