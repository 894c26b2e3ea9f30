//! Shared steps of the lifecycle, ledger, and directory services.

use tracing::warn;

use super::ports::{
    ItemRepositoryError, PickupPointRepository, PickupPointRepositoryError, ReceptionRepository,
    ReceptionRepositoryError,
};
use super::{
    LifecycleError, MissingTarget, PickupPoint, PickupPointId, Principal, Reception, Role,
    StorageFailure,
};

impl From<PickupPointRepositoryError> for LifecycleError {
    fn from(value: PickupPointRepositoryError) -> Self {
        match value {
            PickupPointRepositoryError::Connection { message } => {
                StorageFailure::Unavailable { message }.into()
            }
            PickupPointRepositoryError::Query { message } => StorageFailure::Query { message }.into(),
        }
    }
}

impl From<ReceptionRepositoryError> for LifecycleError {
    fn from(value: ReceptionRepositoryError) -> Self {
        match value {
            ReceptionRepositoryError::Connection { message } => {
                StorageFailure::Unavailable { message }.into()
            }
            ReceptionRepositoryError::Query { message } => StorageFailure::Query { message }.into(),
            // Start resolves this variant itself; anywhere else it is unexpected.
            err @ ReceptionRepositoryError::ActiveReceptionExists { .. } => StorageFailure::Query {
                message: err.to_string(),
            }
            .into(),
        }
    }
}

impl From<ItemRepositoryError> for LifecycleError {
    fn from(value: ItemRepositoryError) -> Self {
        match value {
            ItemRepositoryError::Connection { message } => {
                StorageFailure::Unavailable { message }.into()
            }
            ItemRepositoryError::Query { message } => StorageFailure::Query { message }.into(),
        }
    }
}

/// Fail with `Forbidden` unless the caller holds one of `allowed`.
pub(crate) fn require_role(principal: &Principal, allowed: &[Role]) -> Result<(), LifecycleError> {
    if allowed.contains(&principal.role()) {
        Ok(())
    } else {
        Err(LifecycleError::Forbidden {
            role: principal.role(),
        })
    }
}

/// Fetch the pickup point or fail with `NotFound(PickupPoint)`.
pub(crate) async fn require_pickup_point<P>(
    pickup_points: &P,
    id: PickupPointId,
) -> Result<PickupPoint, LifecycleError>
where
    P: PickupPointRepository + ?Sized,
{
    pickup_points
        .find_by_id(id)
        .await?
        .ok_or(LifecycleError::pickup_point_not_found(id))
}

/// Fetch the most recent reception and insist it is still in progress.
///
/// No reception at all is `NotFound(Reception)`; a closed one is
/// `AlreadyClosed`.
pub(crate) async fn require_open_reception<R>(
    receptions: &R,
    pvz_id: PickupPointId,
) -> Result<Reception, LifecycleError>
where
    R: ReceptionRepository + ?Sized,
{
    match receptions.latest_for_pickup_point(pvz_id).await? {
        None => Err(LifecycleError::NotFound(MissingTarget::Reception(pvz_id))),
        Some(reception) if reception.is_open() => Ok(reception),
        Some(_) => Err(LifecycleError::AlreadyClosed { pvz_id }),
    }
}

/// Log storage failures before they are converted for the caller.
pub(crate) fn log_failure(operation: &'static str, error: &LifecycleError) {
    if let LifecycleError::Storage(failure) = error {
        warn!(operation, error = %failure, "storage failure");
    }
}
