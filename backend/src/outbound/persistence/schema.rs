//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Display name (max 100 characters).
        name -> Varchar,
        /// Lower-cased login email; unique.
        email -> Varchar,
        /// `<salt hex>$<digest hex>`.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// User-defined data types; `(user_id, name)` is unique.
    data_types (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        frequency -> Varchar,
        /// Ordered field definitions as a JSON array.
        fields -> Jsonb,
        color -> Varchar,
        icon -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Dated records; removed with their data type.
    entries (id) {
        id -> Uuid,
        user_id -> Uuid,
        data_type_id -> Uuid,
        date -> Timestamptz,
        /// Ordered `{fieldId, value}` pairs as a JSON array.
        fields -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(entries -> data_types (data_type_id));
diesel::allow_tables_to_appear_in_same_query!(data_types, entries);
