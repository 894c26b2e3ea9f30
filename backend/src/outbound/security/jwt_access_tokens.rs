//! HS256 bearer tokens via `jsonwebtoken`.
//!
//! Claims are `sub` (account identifier or the dummy subject), `role`, `iat`,
//! and `exp`. Expiry is computed from the injected clock and checked by
//! `jsonwebtoken` against wall time on verification.

use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{AccessTokenError, AccessTokens};
use crate::domain::{AccessToken, Principal, Role};

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 16;

/// Rejected token configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwtConfigError {
    /// Secret shorter than [`MIN_SECRET_LEN`].
    #[error("jwt secret must be at least {MIN_SECRET_LEN} bytes")]
    SecretTooShort,
    /// Lifetime of zero or less.
    #[error("token lifetime must be positive")]
    NonPositiveTtl,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies access tokens with a shared secret.
pub struct JwtAccessTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtAccessTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAccessTokens")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtAccessTokens {
    /// Build the adapter.
    ///
    /// # Errors
    ///
    /// Rejects short secrets and non-positive lifetimes.
    pub fn new(secret: &[u8], ttl: TimeDelta, clock: Arc<dyn Clock>) -> Result<Self, JwtConfigError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtConfigError::SecretTooShort);
        }
        if ttl <= TimeDelta::zero() {
            return Err(JwtConfigError::NonPositiveTtl);
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        })
    }
}

impl AccessTokens for JwtAccessTokens {
    fn issue(&self, principal: &Principal) -> Result<AccessToken, AccessTokenError> {
        let now = self.clock.utc();
        let claims = Claims {
            sub: principal.subject().to_owned(),
            role: principal.role().as_str().to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AccessToken::new)
            .map_err(|err| AccessTokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Principal, AccessTokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AccessTokenError::expired(),
                _ => AccessTokenError::invalid(err.to_string()),
            })?;
        let role = data
            .claims
            .role
            .parse::<Role>()
            .map_err(|err| AccessTokenError::invalid(err.to_string()))?;
        Ok(Principal::new(data.claims.sub, role))
    }
}
