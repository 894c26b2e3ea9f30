//! Registration, login, and bearer token verification.
//!
//! Password hashing is CPU-bound and runs on the blocking pool so it does not
//! stall the async workers serving other requests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::ports::{
    AccessTokenError, AccessTokens, AccountCommand, AccountRepository, AccountRepositoryError,
    PasswordHasher, PasswordHasherError,
};
use super::{
    AccessToken, Account, Error, LoginCredentials, NewAccount, PasswordHash, Principal,
    Registration, Role,
};

/// Subject carried by tokens from the development login.
pub const DUMMY_SUBJECT: &str = "dummy";

const BAD_CREDENTIALS: &str = "invalid email or password";

/// Implementation of [`AccountCommand`].
pub struct AccountService<A, H, T> {
    accounts: Arc<A>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<A, H, T> AccountService<A, H, T> {
    /// Create the service.
    pub fn new(accounts: Arc<A>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            accounts,
            hasher,
            tokens,
        }
    }
}

fn map_repository_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            warn!(error = %message, "account storage unavailable");
            Error::service_unavailable("account storage is temporarily unavailable")
        }
        AccountRepositoryError::Query { message } => {
            warn!(error = %message, "account query failed");
            Error::internal(format!("account query failed: {message}"))
        }
        AccountRepositoryError::EmailTaken { email } => {
            Error::conflict(format!("email {email} is already registered"))
                .with_details(serde_json::json!({ "field": "email", "code": "email_taken" }))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    warn!(error = %error, "password hasher failed");
    Error::internal(error.to_string())
}

fn map_token_error(error: AccessTokenError) -> Error {
    match error {
        AccessTokenError::Signing { message } => {
            Error::internal(format!("token signing failed: {message}"))
        }
        AccessTokenError::Invalid { .. } | AccessTokenError::Expired {} => {
            debug!(error = %error, "bearer token rejected");
            Error::unauthorized("invalid or expired token")
        }
    }
}

impl<A, H, T> AccountService<A, H, T>
where
    A: AccountRepository,
    H: PasswordHasher + 'static,
    T: AccessTokens,
{
    async fn hash(&self, password: &str) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|err| Error::internal(format!("hashing task failed: {err}")))?
            .map_err(map_hasher_error)
    }

    async fn verify(&self, password: &str, hash: PasswordHash) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        task::spawn_blocking(move || hasher.verify(password.as_str(), &hash))
            .await
            .map_err(|err| Error::internal(format!("verification task failed: {err}")))?
            .map_err(map_hasher_error)
    }
}

#[async_trait]
impl<A, H, T> AccountCommand for AccountService<A, H, T>
where
    A: AccountRepository,
    H: PasswordHasher + 'static,
    T: AccessTokens,
{
    async fn dummy_login(&self, role: Role) -> Result<AccessToken, Error> {
        let principal = Principal::new(DUMMY_SUBJECT, role);
        self.tokens.issue(&principal).map_err(map_token_error)
    }

    async fn register(&self, registration: &Registration) -> Result<Account, Error> {
        let password_hash = self.hash(registration.password()).await?;
        let account = self
            .accounts
            .create(&NewAccount {
                email: registration.email().clone(),
                password_hash,
                role: registration.role(),
            })
            .await
            .map_err(map_repository_error)?;
        info!(account_id = %account.id(), role = %account.role(), "account registered");
        Ok(account)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        let Some(account) = self
            .accounts
            .find_by_email(credentials.email())
            .await
            .map_err(map_repository_error)?
        else {
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        };

        let matches = self
            .verify(credentials.password(), account.password_hash().clone())
            .await?;
        if !matches {
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        }

        info!(account_id = %account.id(), "account logged in");
        self.tokens
            .issue(&account.principal())
            .map_err(map_token_error)
    }

    async fn authenticate(&self, token: &str) -> Result<Principal, Error> {
        self.tokens.verify(token).map_err(map_token_error)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
