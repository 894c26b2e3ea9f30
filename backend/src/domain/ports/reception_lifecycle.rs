//! Driving port for starting and closing receptions.

use async_trait::async_trait;

use crate::domain::{LifecycleError, PickupPointId, Principal, Reception};

/// Use-case port for the reception state machine.
///
/// `start` fails with `NotFound`, `UnclosedReceptionExists`, `Forbidden`, or
/// `Storage`; `close` swaps `UnclosedReceptionExists` for `AlreadyClosed`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReceptionLifecycle: Send + Sync {
    /// Start a reception unless one is already in progress.
    async fn start(&self, principal: &Principal, pvz_id: PickupPointId)
    -> Result<Reception, LifecycleError>;

    /// Close the in-progress reception.
    async fn close(&self, principal: &Principal, pvz_id: PickupPointId)
    -> Result<Reception, LifecycleError>;
}
