//! In-memory implementation of every repository port.
//!
//! Mirrors the PostgreSQL adapters closely enough for service and HTTP tests:
//! sequences start at 1, the active-reception uniqueness rule can be toggled,
//! and individual failures can be injected.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, ItemRepository, ItemRepositoryError,
    PickupPointRepository, PickupPointRepositoryError, ReceptionRepository,
    ReceptionRepositoryError,
};
use crate::domain::{
    Account, AccountId, City, Email, Item, ItemCategory, ItemId, NewAccount, PickupPoint,
    PickupPointId, Reception, ReceptionId, ReceptionStatus, ReceptionWindow,
};

#[derive(Debug, Clone)]
struct StoredItem {
    category: ItemCategory,
    added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct Link {
    seq: i64,
    reception_id: ReceptionId,
    item_id: ItemId,
}

#[derive(Debug)]
struct State {
    sequence: i64,
    pickup_points: Vec<PickupPoint>,
    receptions: Vec<Reception>,
    items: HashMap<ItemId, StoredItem>,
    links: Vec<Link>,
    accounts: Vec<Account>,
    enforce_single_active: bool,
    fail_next_attach: bool,
    unavailable: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            sequence: 0,
            pickup_points: Vec::new(),
            receptions: Vec::new(),
            items: HashMap::new(),
            links: Vec::new(),
            accounts: Vec::new(),
            enforce_single_active: true,
            fail_next_attach: false,
            unavailable: false,
        }
    }
}

impl State {
    /// Advance the shared sequence and convert it into a typed identifier.
    fn next_id<T>(&mut self) -> Result<T, String>
    where
        T: TryFrom<i64>,
        T::Error: std::fmt::Display,
    {
        let raw = self
            .sequence
            .checked_add(1)
            .ok_or_else(|| "identifier sequence exhausted".to_owned())?;
        self.sequence = raw;
        T::try_from(raw).map_err(|err| format!("sequence produced invalid id {raw}: {err}"))
    }

    fn latest(&self, pvz_id: PickupPointId) -> Option<&Reception> {
        self.receptions
            .iter()
            .filter(|r| r.pickup_point_id() == pvz_id)
            .max_by_key(|r| (r.started_at(), r.id()))
    }
}

/// Shared in-memory store. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    /// Empty store with the active-reception rule enforced.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that accepts any number of in-progress receptions per pickup
    /// point, for exercising service-level serialisation on its own.
    pub fn without_active_reception_rule() -> Self {
        let store = Self::default();
        store.lock().enforce_single_active = false;
        store
    }

    /// Make the next `attach` call fail with a query error.
    pub fn fail_next_attach(&self) {
        self.lock().fail_next_attach = true;
    }

    /// Toggle connection failures for every call.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Number of receptions currently in progress at `pvz_id`.
    pub fn in_progress_count(&self, pvz_id: PickupPointId) -> usize {
        self.lock()
            .receptions
            .iter()
            .filter(|r| r.pickup_point_id() == pvz_id && r.is_open())
            .count()
    }

    /// Number of item records, attached or not.
    pub fn item_count(&self) -> usize {
        self.lock().items.len()
    }

    /// Item identifiers attached to `reception_id`, in attachment order.
    pub fn attached_items(&self, reception_id: ReceptionId) -> Vec<ItemId> {
        self.lock()
            .links
            .iter()
            .filter(|link| link.reception_id == reception_id)
            .map(|link| link.item_id)
            .collect()
    }

    /// Insert a reception directly, bypassing the services.
    ///
    /// # Errors
    ///
    /// Returns a query error when the identifier sequence is exhausted.
    pub fn seed_reception(
        &self,
        pvz_id: PickupPointId,
        started_at: DateTime<Utc>,
        status: ReceptionStatus,
    ) -> Result<Reception, ReceptionRepositoryError> {
        let mut state = self.lock();
        let id = state.next_id().map_err(ReceptionRepositoryError::query)?;
        let reception = Reception::new(id, pvz_id, started_at, status);
        state.receptions.push(reception.clone());
        Ok(reception)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn guard<E>(&self, unavailable: impl FnOnce() -> E) -> Result<MutexGuard<'_, State>, E> {
        let state = self.lock();
        if state.unavailable {
            return Err(unavailable());
        }
        Ok(state)
    }
}

#[async_trait]
impl PickupPointRepository for InMemoryStore {
    async fn create(
        &self,
        city: City,
        registered_at: DateTime<Utc>,
    ) -> Result<PickupPoint, PickupPointRepositoryError> {
        let mut state = self.guard(|| PickupPointRepositoryError::connection("store offline"))?;
        let id = state
            .next_id()
            .map_err(PickupPointRepositoryError::query)?;
        let pickup_point = PickupPoint::new(id, city, registered_at);
        state.pickup_points.push(pickup_point.clone());
        Ok(pickup_point)
    }

    async fn find_by_id(
        &self,
        id: PickupPointId,
    ) -> Result<Option<PickupPoint>, PickupPointRepositoryError> {
        let state = self.guard(|| PickupPointRepositoryError::connection("store offline"))?;
        Ok(state.pickup_points.iter().find(|p| p.id() == id).cloned())
    }

    async fn list_page(
        &self,
        page: PageRequest,
    ) -> Result<Vec<PickupPoint>, PickupPointRepositoryError> {
        let state = self.guard(|| PickupPointRepositoryError::connection("store offline"))?;
        let mut points = state.pickup_points.clone();
        points.sort_by_key(PickupPoint::id);
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(points.into_iter().skip(skip).take(take).collect())
    }
}

#[async_trait]
impl ReceptionRepository for InMemoryStore {
    async fn latest_for_pickup_point(
        &self,
        pvz_id: PickupPointId,
    ) -> Result<Option<Reception>, ReceptionRepositoryError> {
        let latest = {
            let state = self.guard(|| ReceptionRepositoryError::connection("store offline"))?;
            state.latest(pvz_id).cloned()
        };
        // Give concurrent callers a chance to interleave between read and write.
        tokio::task::yield_now().await;
        Ok(latest)
    }

    async fn create(
        &self,
        pvz_id: PickupPointId,
        started_at: DateTime<Utc>,
    ) -> Result<Reception, ReceptionRepositoryError> {
        let mut state = self.guard(|| ReceptionRepositoryError::connection("store offline"))?;
        let active = state
            .receptions
            .iter()
            .any(|r| r.pickup_point_id() == pvz_id && r.is_open());
        if active && state.enforce_single_active {
            return Err(ReceptionRepositoryError::active_reception_exists(pvz_id));
        }
        let id = state.next_id().map_err(ReceptionRepositoryError::query)?;
        let reception = Reception::new(id, pvz_id, started_at, ReceptionStatus::InProgress);
        state.receptions.push(reception.clone());
        Ok(reception)
    }

    async fn close(
        &self,
        id: ReceptionId,
    ) -> Result<Option<Reception>, ReceptionRepositoryError> {
        let mut state = self.guard(|| ReceptionRepositoryError::connection("store offline"))?;
        let Some(slot) = state
            .receptions
            .iter_mut()
            .find(|r| r.id() == id && r.is_open())
        else {
            return Ok(None);
        };
        let closed = Reception::new(
            slot.id(),
            slot.pickup_point_id(),
            slot.started_at(),
            ReceptionStatus::Closed,
        );
        *slot = closed.clone();
        Ok(Some(closed))
    }

    async fn list_for_pickup_points(
        &self,
        pvz_ids: &[PickupPointId],
        window: ReceptionWindow,
    ) -> Result<Vec<Reception>, ReceptionRepositoryError> {
        let state = self.guard(|| ReceptionRepositoryError::connection("store offline"))?;
        let mut receptions: Vec<Reception> = state
            .receptions
            .iter()
            .filter(|r| pvz_ids.contains(&r.pickup_point_id()) && window.contains(r.started_at()))
            .cloned()
            .collect();
        receptions.sort_by(|a, b| {
            a.pickup_point_id()
                .cmp(&b.pickup_point_id())
                .then(b.started_at().cmp(&a.started_at()))
                .then(b.id().cmp(&a.id()))
        });
        Ok(receptions)
    }
}

#[async_trait]
impl ItemRepository for InMemoryStore {
    async fn create(
        &self,
        category: &ItemCategory,
        added_at: DateTime<Utc>,
    ) -> Result<ItemId, ItemRepositoryError> {
        let mut state = self.guard(|| ItemRepositoryError::connection("store offline"))?;
        let id: ItemId = state.next_id().map_err(ItemRepositoryError::query)?;
        state.items.insert(
            id,
            StoredItem {
                category: category.clone(),
                added_at,
            },
        );
        Ok(id)
    }

    async fn attach(
        &self,
        reception_id: ReceptionId,
        item_id: ItemId,
    ) -> Result<(), ItemRepositoryError> {
        let mut state = self.guard(|| ItemRepositoryError::connection("store offline"))?;
        if std::mem::take(&mut state.fail_next_attach) {
            return Err(ItemRepositoryError::query("injected attach failure"));
        }
        let seq: i64 = state.next_id().map_err(ItemRepositoryError::query)?;
        state.links.push(Link {
            seq,
            reception_id,
            item_id,
        });
        Ok(())
    }

    async fn detach_last(
        &self,
        reception_id: ReceptionId,
    ) -> Result<Option<Item>, ItemRepositoryError> {
        let mut state = self.guard(|| ItemRepositoryError::connection("store offline"))?;
        let Some(position) = state
            .links
            .iter()
            .enumerate()
            .filter(|(_, link)| link.reception_id == reception_id)
            .max_by_key(|(_, link)| link.seq)
            .map(|(position, _)| position)
        else {
            return Ok(None);
        };
        let link = state.links.remove(position);
        let Some(stored) = state.items.remove(&link.item_id) else {
            return Err(ItemRepositoryError::query("attached item record missing"));
        };
        Ok(Some(Item::new(
            link.item_id,
            reception_id,
            stored.category,
            stored.added_at,
        )))
    }

    async fn list_for_receptions(
        &self,
        reception_ids: &[ReceptionId],
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        let state = self.guard(|| ItemRepositoryError::connection("store offline"))?;
        let mut links: Vec<Link> = state
            .links
            .iter()
            .filter(|link| reception_ids.contains(&link.reception_id))
            .copied()
            .collect();
        links.sort_by_key(|link| link.seq);
        Ok(links
            .into_iter()
            .filter_map(|link| {
                state.items.get(&link.item_id).map(|stored| {
                    Item::new(
                        link.item_id,
                        link.reception_id,
                        stored.category.clone(),
                        stored.added_at,
                    )
                })
            })
            .collect())
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn create(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError> {
        let mut state = self.guard(|| AccountRepositoryError::connection("store offline"))?;
        if state.accounts.iter().any(|a| a.email() == &account.email) {
            return Err(AccountRepositoryError::email_taken(account.email.as_ref()));
        }
        let id: AccountId = state.next_id().map_err(AccountRepositoryError::query)?;
        let stored = Account::new(
            id,
            account.email.clone(),
            account.password_hash.clone(),
            account.role,
        );
        state.accounts.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountRepositoryError> {
        let state = self.guard(|| AccountRepositoryError::connection("store offline"))?;
        Ok(state.accounts.iter().find(|a| a.email() == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn exhausted_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.lock().sequence = i64::MAX;
        store
    }

    #[rstest]
    #[tokio::test]
    async fn exhausted_sequence_is_a_query_error() {
        let store = exhausted_store();

        let result = PickupPointRepository::create(&store, City::Kazan, Utc::now()).await;

        assert!(
            matches!(result, Err(PickupPointRepositoryError::Query { .. })),
            "expected a query error, got {result:?}"
        );
        assert!(store.lock().pickup_points.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn exhausted_sequence_fails_item_creation() {
        let store = exhausted_store();
        let category = ItemCategory::new("обувь").expect("valid category");

        let result = ItemRepository::create(&store, &category, Utc::now()).await;

        assert!(
            matches!(result, Err(ItemRepositoryError::Query { .. })),
            "expected a query error, got {result:?}"
        );
        assert_eq!(store.item_count(), 0);
    }
}
