//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types re-validate every column so a corrupt row surfaces as a query error.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{products, pvz, reception_products, receptions, users};

/// Row struct for reading from the pvz table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pvz)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PickupPointRow {
    pub id: i64,
    pub city: String,
    pub registration_date: DateTime<Utc>,
}

/// Insertable struct for opening a pickup point.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pvz)]
pub(crate) struct NewPickupPointRow<'a> {
    pub city: &'a str,
    pub registration_date: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Reception models
// ---------------------------------------------------------------------------

/// Row struct for reading from the receptions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = receptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReceptionRow {
    pub id: i64,
    pub pvz_id: i64,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

/// Insertable struct for starting a reception.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = receptions)]
pub(crate) struct NewReceptionRow<'a> {
    pub pvz_id: i64,
    pub created_at: DateTime<Utc>,
    pub status: &'a str,
}

// ---------------------------------------------------------------------------
// Item models
// ---------------------------------------------------------------------------

/// Row struct for reading from the products table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub product_type: String,
}

/// Insertable struct for logging an item.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub created_at: DateTime<Utc>,
    pub product_type: &'a str,
}

/// Insertable struct for the item to reception association.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reception_products)]
pub(crate) struct NewReceptionProductRow {
    pub reception_id: i64,
    pub product_id: i64,
}

// ---------------------------------------------------------------------------
// Account models
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Insertable struct for registering an account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewAccountRow<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}
