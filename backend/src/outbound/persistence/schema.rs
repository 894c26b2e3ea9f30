//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a migration
//! changes the schema, regenerate them with `diesel print-schema` or update
//! them by hand.

diesel::table! {
    /// Pickup points.
    pvz (id) {
        /// Primary key from a `BIGSERIAL` sequence.
        id -> Int8,
        /// City display name; restricted by a check constraint.
        city -> Varchar,
        /// Opening timestamp.
        registration_date -> Timestamptz,
    }
}

diesel::table! {
    /// Receptions. A partial unique index allows one `in_progress` row per
    /// pickup point.
    receptions (id) {
        id -> Int8,
        pvz_id -> Int8,
        created_at -> Timestamptz,
        /// `in_progress` or `closed`.
        status -> Varchar,
    }
}

diesel::table! {
    /// Logged items.
    products (id) {
        id -> Int8,
        created_at -> Timestamptz,
        #[sql_name = "type"]
        product_type -> Text,
    }
}

diesel::table! {
    /// Item to reception association. `seq` orders removals.
    reception_products (seq) {
        seq -> Int8,
        reception_id -> Int8,
        product_id -> Int8,
    }
}

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int8,
        email -> Varchar,
        password_hash -> Text,
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(receptions -> pvz (pvz_id));
diesel::joinable!(reception_products -> receptions (reception_id));
diesel::joinable!(reception_products -> products (product_id));

diesel::allow_tables_to_appear_in_same_query!(pvz, receptions, products, reception_products, users);
