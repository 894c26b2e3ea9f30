//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::TimeDelta;

use crate::domain::{
    AccountService, ItemLedgerService, PickupPointDirectoryService, PickupPointLocks,
    ReceptionLifecycleService, Role,
};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::security::JwtAccessTokens;
use crate::test_support::{InMemoryStore, PlainPasswordHasher};

const TEST_SECRET: &[u8] = b"http-test-secret-0123456789";

/// Real services over `store`, with real JWTs and a plain password hasher.
pub fn memory_state(store: &InMemoryStore) -> web::Data<HttpState> {
    let clock: Arc<dyn mockable::Clock> = Arc::new(mockable::DefaultClock);
    let shared = Arc::new(store.clone());
    let locks = PickupPointLocks::new();
    let tokens = JwtAccessTokens::new(TEST_SECRET, TimeDelta::hours(1), clock.clone())
        .expect("test token settings are valid");

    web::Data::new(HttpState::new(HttpStatePorts {
        accounts: Arc::new(AccountService::new(
            shared.clone(),
            Arc::new(PlainPasswordHasher),
            Arc::new(tokens),
        )),
        pickup_points: Arc::new(PickupPointDirectoryService::with_noop_metrics(
            shared.clone(),
            shared.clone(),
            shared.clone(),
            clock.clone(),
        )),
        receptions: Arc::new(ReceptionLifecycleService::with_noop_metrics(
            shared.clone(),
            shared.clone(),
            locks.clone(),
            clock.clone(),
        )),
        items: Arc::new(ItemLedgerService::with_noop_metrics(
            shared.clone(),
            shared.clone(),
            shared,
            locks,
            clock,
        )),
    }))
}

/// Application with every PVZ route mounted on `state`.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).configure(configure)
}

/// `Authorization` header value for a synthetic principal holding `role`.
pub async fn bearer_for(state: &web::Data<HttpState>, role: Role) -> String {
    let token = state
        .accounts
        .dummy_login(role)
        .await
        .expect("dummy login succeeds");
    format!("Bearer {}", token.as_str())
}
