//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hashing, tokens, metrics) are implemented by
//! outbound adapters. Driving ports are implemented by the domain services and
//! called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod access_tokens;
mod account_command;
mod account_repository;
mod domain_metrics;
mod item_ledger;
mod item_repository;
mod password_hasher;
mod pickup_point_directory;
mod pickup_point_repository;
mod reception_lifecycle;
mod reception_repository;

#[cfg(test)]
pub use access_tokens::MockAccessTokens;
pub use access_tokens::{AccessTokenError, AccessTokens};
#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{
    AccountRepository, AccountRepositoryError, FixtureAccountRepository,
};
#[cfg(test)]
pub use domain_metrics::MockDomainMetrics;
pub use domain_metrics::{DomainMetrics, DomainMetricsError, NoOpDomainMetrics};
#[cfg(test)]
pub use item_ledger::MockItemLedger;
pub use item_ledger::ItemLedger;
#[cfg(test)]
pub use item_repository::MockItemRepository;
pub use item_repository::{FixtureItemRepository, ItemRepository, ItemRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use pickup_point_directory::MockPickupPointDirectory;
pub use pickup_point_directory::PickupPointDirectory;
#[cfg(test)]
pub use pickup_point_repository::MockPickupPointRepository;
pub use pickup_point_repository::{
    FixturePickupPointRepository, PickupPointRepository, PickupPointRepositoryError,
};
#[cfg(test)]
pub use reception_lifecycle::MockReceptionLifecycle;
pub use reception_lifecycle::ReceptionLifecycle;
#[cfg(test)]
pub use reception_repository::MockReceptionRepository;
pub use reception_repository::{
    FixtureReceptionRepository, ReceptionRepository, ReceptionRepositoryError,
};
