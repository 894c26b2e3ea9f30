//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only ever talk to driving
//! ports, so they can be exercised with mocks and without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, ItemLedger, PickupPointDirectory, ReceptionLifecycle};

/// Parameter object bundling the driving ports used by the handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub pickup_points: Arc<dyn PickupPointDirectory>,
    pub receptions: Arc<dyn ReceptionLifecycle>,
    pub items: Arc<dyn ItemLedger>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub pickup_points: Arc<dyn PickupPointDirectory>,
    pub receptions: Arc<dyn ReceptionLifecycle>,
    pub items: Arc<dyn ItemLedger>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use pvz_backend::domain::{
    ///     AccountService, ItemLedgerService, PickupPointDirectoryService, PickupPointLocks,
    ///     ReceptionLifecycleService,
    /// };
    /// use pvz_backend::domain::ports::{
    ///     FixtureAccountRepository, FixtureItemRepository, FixturePickupPointRepository,
    ///     FixtureReceptionRepository,
    /// };
    /// use pvz_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use pvz_backend::outbound::security::{Argon2PasswordHasher, JwtAccessTokens};
    ///
    /// let clock: Arc<dyn mockable::Clock> = Arc::new(mockable::DefaultClock);
    /// let locks = PickupPointLocks::new();
    /// let pickup_points = Arc::new(FixturePickupPointRepository);
    /// let receptions = Arc::new(FixtureReceptionRepository);
    /// let items = Arc::new(FixtureItemRepository);
    /// let tokens = JwtAccessTokens::new(
    ///     b"sixteen-byte-secret!",
    ///     chrono::TimeDelta::hours(72),
    ///     clock.clone(),
    /// )
    /// .expect("valid token settings");
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     accounts: Arc::new(AccountService::new(
    ///         Arc::new(FixtureAccountRepository),
    ///         Arc::new(Argon2PasswordHasher::default()),
    ///         Arc::new(tokens),
    ///     )),
    ///     pickup_points: Arc::new(PickupPointDirectoryService::with_noop_metrics(
    ///         pickup_points.clone(),
    ///         receptions.clone(),
    ///         items.clone(),
    ///         clock.clone(),
    ///     )),
    ///     receptions: Arc::new(ReceptionLifecycleService::with_noop_metrics(
    ///         pickup_points.clone(),
    ///         receptions.clone(),
    ///         locks.clone(),
    ///         clock.clone(),
    ///     )),
    ///     items: Arc::new(ItemLedgerService::with_noop_metrics(
    ///         pickup_points,
    ///         receptions,
    ///         items,
    ///         locks,
    ///         clock,
    ///     )),
    /// });
    /// let _accounts = state.accounts.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            pickup_points,
            receptions,
            items,
        } = ports;
        Self {
            accounts,
            pickup_points,
            receptions,
            items,
        }
    }
}
