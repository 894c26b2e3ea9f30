//! Builders for the HTTP state ports.
//!
//! With a pool the services run over the Diesel repositories. Without one
//! they run over the fixture repositories, which accept writes but persist
//! nothing; that mode only serves smoke tests and local probing.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use pvz_backend::domain::ports::{
    AccountRepository, DomainMetrics, FixtureAccountRepository, FixtureItemRepository,
    FixturePickupPointRepository, FixtureReceptionRepository, ItemRepository,
    NoOpDomainMetrics, PickupPointRepository, ReceptionRepository,
};
use pvz_backend::domain::{
    AccountService, ItemLedgerService, PickupPointDirectoryService, PickupPointLocks,
    ReceptionLifecycleService,
};
use pvz_backend::inbound::http::state::{HttpState, HttpStatePorts};
#[cfg(feature = "metrics")]
use pvz_backend::outbound::metrics::PrometheusDomainMetrics;
use pvz_backend::outbound::persistence::{
    DieselAccountRepository, DieselItemRepository, DieselPickupPointRepository,
    DieselReceptionRepository,
};
use pvz_backend::outbound::security::{Argon2PasswordHasher, JwtAccessTokens};

use super::ServerConfig;

/// Repository adapters backing one server instance.
struct Repositories<P, R, I, A> {
    pickup_points: Arc<P>,
    receptions: Arc<R>,
    items: Arc<I>,
    accounts: Arc<A>,
}

/// Wire the four services over one set of repositories.
///
/// Lifecycle and ledger share a single [`PickupPointLocks`] so their
/// mutations of the same pickup point serialise.
fn build_ports<P, R, I, A, M>(
    repos: Repositories<P, R, I, A>,
    metrics: Arc<M>,
    tokens: JwtAccessTokens,
    clock: Arc<dyn Clock>,
) -> HttpStatePorts
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
    I: ItemRepository + 'static,
    A: AccountRepository + 'static,
    M: DomainMetrics + 'static,
{
    let Repositories {
        pickup_points,
        receptions,
        items,
        accounts,
    } = repos;
    let locks = PickupPointLocks::new();

    HttpStatePorts {
        accounts: Arc::new(AccountService::new(
            accounts,
            Arc::new(Argon2PasswordHasher::default()),
            Arc::new(tokens),
        )),
        pickup_points: Arc::new(PickupPointDirectoryService::new(
            pickup_points.clone(),
            receptions.clone(),
            items.clone(),
            metrics.clone(),
            clock.clone(),
        )),
        receptions: Arc::new(ReceptionLifecycleService::new(
            pickup_points.clone(),
            receptions.clone(),
            locks.clone(),
            metrics.clone(),
            clock.clone(),
        )),
        items: Arc::new(ItemLedgerService::new(
            pickup_points,
            receptions,
            items,
            locks,
            metrics,
            clock,
        )),
    }
}

/// Select the business metrics sink.
///
/// Prometheus counters are registered on the middleware registry when the
/// feature and the middleware are both present.
#[cfg(feature = "metrics")]
fn with_metrics<P, R, I, A>(
    config: &ServerConfig,
    repos: Repositories<P, R, I, A>,
    tokens: JwtAccessTokens,
    clock: Arc<dyn Clock>,
) -> std::io::Result<HttpStatePorts>
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
    I: ItemRepository + 'static,
    A: AccountRepository + 'static,
{
    match &config.prometheus {
        Some(prom) => {
            let metrics = PrometheusDomainMetrics::new(&prom.registry).map_err(|e| {
                std::io::Error::other(format!("domain metrics registration failed: {e}"))
            })?;
            Ok(build_ports(repos, Arc::new(metrics), tokens, clock))
        }
        None => Ok(build_ports(repos, Arc::new(NoOpDomainMetrics), tokens, clock)),
    }
}

#[cfg(not(feature = "metrics"))]
fn with_metrics<P, R, I, A>(
    _config: &ServerConfig,
    repos: Repositories<P, R, I, A>,
    tokens: JwtAccessTokens,
    clock: Arc<dyn Clock>,
) -> std::io::Result<HttpStatePorts>
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
    I: ItemRepository + 'static,
    A: AccountRepository + 'static,
{
    Ok(build_ports(repos, Arc::new(NoOpDomainMetrics), tokens, clock))
}

/// Build the shared HTTP state for every worker.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the token settings are rejected or
/// Prometheus metric registration fails.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens = JwtAccessTokens::new(config.tokens.secret(), config.tokens.ttl(), clock.clone())
        .map_err(|e| std::io::Error::other(format!("invalid token settings: {e}")))?;

    let ports = match &config.db_pool {
        Some(pool) => with_metrics(
            config,
            Repositories {
                pickup_points: Arc::new(DieselPickupPointRepository::new(pool.clone())),
                receptions: Arc::new(DieselReceptionRepository::new(pool.clone())),
                items: Arc::new(DieselItemRepository::new(pool.clone())),
                accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
            },
            tokens,
            clock,
        )?,
        None => with_metrics(
            config,
            Repositories {
                pickup_points: Arc::new(FixturePickupPointRepository),
                receptions: Arc::new(FixtureReceptionRepository),
                items: Arc::new(FixtureItemRepository),
                accounts: Arc::new(FixtureAccountRepository),
            },
            tokens,
            clock,
        )?,
    };

    Ok(web::Data::new(HttpState::new(ports)))
}
