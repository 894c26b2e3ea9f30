//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the pickup point, reception, and item model, the closed
//! failure taxonomy of the reception state machine, and the services that
//! implement the driving ports. Transport and storage concerns stay behind
//! the ports in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) - API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) - stable error identifier.
//! - LifecycleError - typed failures of lifecycle and ledger operations.
//! - ReceptionLifecycleService, ItemLedgerService,
//!   PickupPointDirectoryService, AccountService - port implementations.

pub mod account;
pub mod error;
pub mod ids;
pub mod item;
pub mod lifecycle_error;
pub mod listing;
pub mod locks;
pub mod pickup_point;
pub mod ports;
pub mod reception;
pub mod trace_id;

mod account_service;
mod item_ledger_service;
mod lifecycle_support;
mod pickup_point_directory_service;
mod reception_lifecycle_service;

pub use self::account::{
    AccessToken, Account, AccountValidationError, EMAIL_MAX, Email, LoginCredentials,
    NewAccount, PasswordHash, Principal, Registration, Role, UnknownRole,
};
pub use self::account_service::{AccountService, DUMMY_SUBJECT};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::ids::{AccountId, IdValidationError, ItemId, PickupPointId, ReceptionId};
pub use self::item::{Item, ItemCategory, ItemCategoryValidationError};
pub use self::item_ledger_service::ItemLedgerService;
pub use self::lifecycle_error::{LifecycleError, MissingTarget, StorageFailure};
pub use self::listing::{
    InvertedWindow, PickupPointOverview, ReceptionOverview, ReceptionWindow,
};
pub use self::locks::{PickupPointGuard, PickupPointLocks};
pub use self::pickup_point::{City, PickupPoint, UnsupportedCity};
pub use self::pickup_point_directory_service::PickupPointDirectoryService;
pub use self::reception::{Reception, ReceptionStatus, UnknownReceptionStatus};
pub use self::reception_lifecycle_service::ReceptionLifecycleService;
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use pvz_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
