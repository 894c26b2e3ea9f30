//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin translators between Diesel rows and domain types,
//! running on a bb8 pool of `diesel-async` connections. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) never leave this module.
//!
//! ```ignore
//! use pvz_backend::outbound::persistence::{DbPool, DieselReceptionRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/pvz")).await?;
//! let receptions = DieselReceptionRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_error_mapping;
mod diesel_item_repository;
mod diesel_pickup_point_repository;
mod diesel_reception_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_item_repository::DieselItemRepository;
pub use diesel_pickup_point_repository::DieselPickupPointRepository;
pub use diesel_reception_repository::DieselReceptionRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
