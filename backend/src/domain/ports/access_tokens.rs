//! Port for issuing and verifying bearer tokens.

use crate::domain::{AccessToken, Principal};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum AccessTokenError {
        /// The token could not be signed.
        Signing { message: String } => "access token signing failed: {message}",
        /// The token is malformed, tampered with, or carries unknown claims.
        Invalid { message: String } => "access token is invalid: {message}",
        /// The token has expired.
        Expired {} => "access token has expired",
    }
}

/// Port for token issuance and verification.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokens: Send + Sync {
    /// Sign a token carrying the principal's subject and role.
    fn issue(&self, principal: &Principal) -> Result<AccessToken, AccessTokenError>;

    /// Verify a token and recover its principal.
    fn verify(&self, token: &str) -> Result<Principal, AccessTokenError>;
}
