//! Per-pickup-point serialisation of read-then-act sequences.
//!
//! Starting, closing, adding, and removing all read the most recent reception
//! before writing. Holding the pickup point's guard across both steps keeps
//! two requests for the same pickup point from acting on the same snapshot.
//! Guards for different pickup points never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::PickupPointId;

/// Registry of async mutexes keyed by pickup point.
///
/// Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct PickupPointLocks {
    slots: Arc<Mutex<HashMap<PickupPointId, Arc<AsyncMutex<()>>>>>,
}

/// Exclusive access to one pickup point, released on drop.
#[derive(Debug)]
pub struct PickupPointGuard {
    _guard: OwnedMutexGuard<()>,
}

impl PickupPointLocks {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    pub async fn acquire(&self, id: PickupPointId) -> PickupPointGuard {
        let slot = {
            let mut slots = self
                .slots
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            // Drop idle slots so the map tracks only contended pickup points.
            slots.retain(|key, slot| *key == id || Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry(id).or_default())
        };
        PickupPointGuard {
            _guard: slot.lock_owned().await,
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use rstest::rstest;

    fn pvz(raw: i64) -> PickupPointId {
        PickupPointId::new(raw).expect("valid pickup point id")
    }

    #[rstest]
    #[tokio::test]
    async fn same_pickup_point_is_exclusive() {
        let locks = PickupPointLocks::new();
        let held = locks.acquire(pvz(1)).await;

        let contender = locks.clone();
        let waiting = tokio::spawn(async move { contender.acquire(pvz(1)).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(held);
        tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .expect("guard released")
            .expect("task completes");
    }

    #[rstest]
    #[tokio::test]
    async fn different_pickup_points_do_not_contend() {
        let locks = PickupPointLocks::new();
        let _first = locks.acquire(pvz(1)).await;
        let second = tokio::time::timeout(Duration::from_millis(100), locks.acquire(pvz(2))).await;
        assert!(second.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn idle_slots_are_pruned() {
        let locks = PickupPointLocks::new();
        drop(locks.acquire(pvz(1)).await);
        drop(locks.acquire(pvz(2)).await);
        let _third = locks.acquire(pvz(3)).await;
        assert_eq!(locks.tracked(), 1);
    }
}
