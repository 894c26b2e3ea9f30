//! Backend entry-point: loads settings, prepares storage, and serves the PVZ API.

mod server;

#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use pvz_backend::inbound::http::health::HealthState;
use pvz_backend::outbound::persistence::{DbPool, run_pending_migrations};
use server::{AppSettings, ServerConfig, create_server};

#[cfg(feature = "metrics")]
fn initialize_metrics<E, F>(build: F) -> Option<PrometheusMetrics>
where
    E: std::fmt::Display,
    F: FnOnce() -> Result<PrometheusMetrics, E>,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "metrics disabled: failed to initialise Prometheus exporter");
            None
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(bind_addr, settings.token_settings()?);

    let health_state = match settings.pool_config() {
        Some(pool_config) => {
            if settings.run_migrations() {
                run_pending_migrations(pool_config.database_url())
                    .await
                    .wrap_err("database migrations failed")?;
            } else {
                info!("skipping database migrations");
            }
            let pool = DbPool::new(pool_config)
                .await
                .map_err(|err| eyre!("failed to build database pool: {err}"))?;
            config = config.with_db_pool(pool.clone());
            web::Data::new(HealthState::with_pool(pool))
        }
        None => {
            warn!("PVZ_DATABASE_URL unset; serving fixture repositories without persistence");
            web::Data::new(HealthState::new())
        }
    };

    #[cfg(feature = "metrics")]
    let config = if settings.metrics_enabled() {
        config.with_metrics(initialize_metrics(|| {
            PrometheusMetricsBuilder::new("pvz")
                .endpoint("/metrics")
                .build()
        }))
    } else {
        info!("metrics disabled by configuration");
        config
    };

    info!(%bind_addr, "starting PVZ server");
    create_server(health_state, config)?.await?;
    Ok(())
}
