//! Application settings loaded via OrthoConfig.
//!
//! Every value may come from the command line, a configuration file, or a
//! `PVZ_`-prefixed environment variable. Absent values fall back to the
//! defaults below.

use std::net::SocketAddr;
use std::time::Duration;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use pvz_backend::outbound::persistence::PoolConfig;
use serde::Deserialize;
use tracing::warn;

use super::config::TokenSettings;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 72;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_TIMEOUT_SECS: u64 = 30;
const DEV_JWT_SECRET: &str = "pvz-development-signing-secret";

/// Invalid or missing settings detected at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("bind address `{value}` is not a socket address")]
    InvalidBindAddr { value: String },
    #[error("token lifetime must be a positive number of hours, got {hours}")]
    InvalidTokenTtl { hours: i64 },
    #[error("PVZ_JWT_SECRET must be set in release builds")]
    MissingJwtSecret,
}

/// Startup configuration for the PVZ server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PVZ")]
pub struct AppSettings {
    /// Listen address, `host:port`.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Without it the server runs on fixtures.
    pub database_url: Option<String>,
    /// HS256 signing secret for access tokens.
    pub jwt_secret: Option<String>,
    /// Access token lifetime in hours.
    pub token_ttl_hours: Option<i64>,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_connection_timeout_secs: Option<u64>,
    /// Apply pending migrations at startup. Defaults to true.
    pub run_migrations: Option<bool>,
    /// Serve Prometheus metrics when built with `metrics`. Defaults to true.
    pub metrics_enabled: Option<bool>,
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value does not
    /// parse as a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    /// Token signing material.
    ///
    /// Debug builds fall back to a fixed development secret with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingJwtSecret`] in release builds without a
    /// configured secret, or [`SettingsError::InvalidTokenTtl`] for a
    /// non-positive lifetime.
    pub fn token_settings(&self) -> Result<TokenSettings, SettingsError> {
        let hours = self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS);
        if hours <= 0 {
            return Err(SettingsError::InvalidTokenTtl { hours });
        }
        let secret = match self.jwt_secret.as_deref() {
            Some(secret) => secret.to_owned(),
            None if cfg!(debug_assertions) => {
                warn!("PVZ_JWT_SECRET unset; using development secret (dev only)");
                DEV_JWT_SECRET.to_owned()
            }
            None => return Err(SettingsError::MissingJwtSecret),
        };
        Ok(TokenSettings::new(secret, TimeDelta::hours(hours)))
    }

    /// Whether startup applies pending migrations.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Whether the Prometheus exporter should be mounted.
    #[cfg_attr(
        not(any(test, feature = "metrics")),
        expect(dead_code, reason = "Only read when the metrics feature is enabled")
    )]
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_enabled.unwrap_or(true)
    }

    /// Pool configuration when a database URL is present.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url.as_deref().map(|url| {
            PoolConfig::new(url)
                .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE))
                .with_connection_timeout(Duration::from_secs(
                    self.pool_connection_timeout_secs
                        .unwrap_or(DEFAULT_POOL_TIMEOUT_SECS),
                ))
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "PVZ_BIND_ADDR",
        "PVZ_DATABASE_URL",
        "PVZ_JWT_SECRET",
        "PVZ_TOKEN_TTL_HOURS",
        "PVZ_POOL_MAX_SIZE",
        "PVZ_POOL_CONNECTION_TIMEOUT_SECS",
        "PVZ_RUN_MIGRATIONS",
        "PVZ_METRICS_ENABLED",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("pvz-backend")]).expect("config should load")
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(cleared());

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("valid literal")
        );
        assert!(settings.pool_config().is_none());
        assert!(settings.run_migrations());
        assert!(settings.metrics_enabled());
        let tokens = settings.token_settings().expect("debug fallback secret");
        assert_eq!(tokens.ttl(), TimeDelta::hours(DEFAULT_TOKEN_TTL_HOURS));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = cleared();
        vars.retain(|(name, _)| {
            !matches!(
                *name,
                "PVZ_BIND_ADDR"
                    | "PVZ_DATABASE_URL"
                    | "PVZ_JWT_SECRET"
                    | "PVZ_TOKEN_TTL_HOURS"
                    | "PVZ_RUN_MIGRATIONS"
            )
        });
        vars.extend([
            ("PVZ_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("PVZ_DATABASE_URL", Some("postgres://localhost/pvz".to_owned())),
            ("PVZ_JWT_SECRET", Some("0123456789abcdef0123".to_owned())),
            ("PVZ_TOKEN_TTL_HOURS", Some("2".to_owned())),
            ("PVZ_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("override parses").port(),
            9000
        );
        let pool = settings.pool_config().expect("pool configured");
        assert_eq!(pool.database_url(), "postgres://localhost/pvz");
        let tokens = settings.token_settings().expect("valid token settings");
        assert_eq!(tokens.secret(), b"0123456789abcdef0123");
        assert_eq!(tokens.ttl(), TimeDelta::hours(2));
        assert!(!settings.run_migrations());
    }

    #[rstest]
    #[case(Some("localhost"), None, "bind")]
    #[case(None, Some("0"), "ttl")]
    fn invalid_values_are_reported(
        #[case] bind: Option<&str>,
        #[case] ttl: Option<&str>,
        #[case] which: &str,
    ) {
        let mut vars = cleared();
        vars.retain(|(name, _)| !matches!(*name, "PVZ_BIND_ADDR" | "PVZ_TOKEN_TTL_HOURS"));
        vars.push(("PVZ_BIND_ADDR", bind.map(str::to_owned)));
        vars.push(("PVZ_TOKEN_TTL_HOURS", ttl.map(str::to_owned)));
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        match which {
            "bind" => assert!(matches!(
                settings.bind_addr(),
                Err(SettingsError::InvalidBindAddr { .. })
            )),
            _ => assert_eq!(
                settings.token_settings().map(|_| ()),
                Err(SettingsError::InvalidTokenTtl { hours: 0 })
            ),
        }
    }
}
