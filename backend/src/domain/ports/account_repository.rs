//! Port for account persistence.

use async_trait::async_trait;

use crate::domain::{Account, Email, NewAccount};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account repository query failed: {message}",
        /// An account with this email already exists.
        EmailTaken { email: String } =>
            "an account for {email} already exists",
    }
}

/// Port for registering and looking up accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert an account, failing with `EmailTaken` on duplicates.
    async fn create(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError>;

    /// Find an account by its normalised email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
///
/// Registration always reports the email as taken and lookups find nothing,
/// so servers started without a database cannot mint real accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountRepository;

#[async_trait]
impl AccountRepository for FixtureAccountRepository {
    async fn create(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError> {
        Err(AccountRepositoryError::email_taken(account.email.as_ref()))
    }

    async fn find_by_email(
        &self,
        _email: &Email,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(None)
    }
}
