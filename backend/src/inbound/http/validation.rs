//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure is an `invalid_request` error whose details name the
//! offending `field` and a stable `code`.

use chrono::{DateTime, Utc};
use pagination::{PageParams, PageRequest, PaginationError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    AccountValidationError, City, Error, ItemCategory, PickupPointId, ReceptionWindow, Role,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidIdentifier,
    InvalidTimestamp,
    InvalidWindow,
    UnsupportedCity,
    UnknownRole,
    InvalidEmail,
    InvalidPassword,
    InvalidCategory,
    InvalidPage,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidWindow => "invalid_window",
            Self::UnsupportedCity => "unsupported_city",
            Self::UnknownRole => "unknown_role",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidPassword => "invalid_password",
            Self::InvalidCategory => "invalid_category",
            Self::InvalidPage => "invalid_page",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const PVZ_ID: FieldName = FieldName::new("pvzId");
pub(crate) const CITY: FieldName = FieldName::new("city");
pub(crate) const ROLE: FieldName = FieldName::new("role");
pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const ITEM_TYPE: FieldName = FieldName::new("type");
pub(crate) const START_DATE: FieldName = FieldName::new("startDate");
pub(crate) const END_DATE: FieldName = FieldName::new("endDate");

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_value_error(
    field: FieldName,
    code: ErrorCode,
    message: impl Into<String>,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Pickup point identifier as sent by clients: a JSON number or a numeric
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum PvzIdInput {
    Number(i64),
    Text(String),
}

fn invalid_pvz_id(value: &str) -> Error {
    field_value_error(
        PVZ_ID,
        ErrorCode::InvalidIdentifier,
        "pvzId must be a positive integer",
        value,
    )
}

pub(crate) fn parse_pvz_id_text(raw: &str) -> Result<PickupPointId, Error> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|value| PickupPointId::new(value).ok())
        .ok_or_else(|| invalid_pvz_id(raw))
}

pub(crate) fn parse_pvz_id(input: PvzIdInput) -> Result<PickupPointId, Error> {
    match input {
        PvzIdInput::Number(value) => {
            PickupPointId::new(value).map_err(|_| invalid_pvz_id(&value.to_string()))
        }
        PvzIdInput::Text(raw) => parse_pvz_id_text(&raw),
    }
}

pub(crate) fn parse_city(value: &str) -> Result<City, Error> {
    value.parse::<City>().map_err(|_| {
        let supported = City::ALL.map(City::as_str).join(", ");
        field_value_error(
            CITY,
            ErrorCode::UnsupportedCity,
            format!("city must be one of: {supported}"),
            value,
        )
    })
}

pub(crate) fn parse_role(value: &str) -> Result<Role, Error> {
    value.parse::<Role>().map_err(|_| {
        field_value_error(
            ROLE,
            ErrorCode::UnknownRole,
            "role must be employee or moderator",
            value,
        )
    })
}

pub(crate) fn parse_item_category(value: &str) -> Result<ItemCategory, Error> {
    ItemCategory::new(value)
        .map_err(|err| field_error(ITEM_TYPE, ErrorCode::InvalidCategory, err.to_string()))
}

pub(crate) fn map_account_validation_error(err: AccountValidationError) -> Error {
    match err {
        AccountValidationError::InvalidEmail | AccountValidationError::EmailTooLong { .. } => {
            field_error(EMAIL, ErrorCode::InvalidEmail, err.to_string())
        }
        AccountValidationError::EmptyPassword => {
            field_error(PASSWORD, ErrorCode::InvalidPassword, err.to_string())
        }
    }
}

pub(crate) fn parse_timestamp(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| {
            let name = field.as_str();
            field_value_error(
                field,
                ErrorCode::InvalidTimestamp,
                format!("{name} must be an RFC 3339 timestamp"),
                value,
            )
        })
}

pub(crate) fn parse_window(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<ReceptionWindow, Error> {
    let start = start.map(|raw| parse_timestamp(raw, START_DATE)).transpose()?;
    let end = end.map(|raw| parse_timestamp(raw, END_DATE)).transpose()?;
    ReceptionWindow::new(start, end)
        .map_err(|err| field_error(START_DATE, ErrorCode::InvalidWindow, err.to_string()))
}

pub(crate) fn parse_page(params: PageParams) -> Result<PageRequest, Error> {
    PageRequest::try_from(params).map_err(|err| {
        let field = match err {
            PaginationError::InvalidPage { .. } => FieldName::new("page"),
            PaginationError::InvalidLimit { .. } => FieldName::new("limit"),
        };
        field_error(field, ErrorCode::InvalidPage, err.to_string())
    })
}
