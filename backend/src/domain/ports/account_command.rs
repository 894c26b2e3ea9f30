//! Driving port for account registration, login, and token checks.

use async_trait::async_trait;

use crate::domain::{AccessToken, Account, Error, LoginCredentials, Principal, Registration, Role};

/// Use-case port for the authentication gate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Issue a token for a synthetic principal holding `role`.
    async fn dummy_login(&self, role: Role) -> Result<AccessToken, Error>;

    /// Register a new account.
    async fn register(&self, registration: &Registration) -> Result<Account, Error>;

    /// Exchange valid credentials for a token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error>;

    /// Verify a bearer token and recover its principal.
    async fn authenticate(&self, token: &str) -> Result<Principal, Error>;
}
