//! PVZ backend: pickup points, goods receptions, and the item ledger.
//!
//! The crate follows a hexagonal layout. `domain` holds types, services, and
//! ports; `inbound` adapts HTTP onto the driving ports; `outbound` implements
//! the driven ports against PostgreSQL, JWT, Argon2, and Prometheus.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
