//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`, via
//! the `test-support` feature). Nothing here is wired into the server binary.

mod clock;
mod memory;
mod security;

pub use clock::SteppingClock;
pub use memory::InMemoryStore;
pub use security::PlainPasswordHasher;
