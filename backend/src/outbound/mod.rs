//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories on Diesel with a bb8 pool
//! - **security**: JWT access tokens and Argon2 password hashing
//! - **metrics**: Prometheus business counters (feature `metrics`)
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business rules.

#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
pub mod security;
