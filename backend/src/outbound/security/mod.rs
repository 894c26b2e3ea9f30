//! Token signing and password hashing adapters.

mod argon2_password_hasher;
mod jwt_access_tokens;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use jwt_access_tokens::{JwtAccessTokens, JwtConfigError};
