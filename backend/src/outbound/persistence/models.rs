//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! to and from domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{data_types, entries, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = data_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DataTypeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub frequency: String,
    pub fields: serde_json::Value,
    pub color: String,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = data_types)]
pub(crate) struct NewDataTypeRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub frequency: &'a str,
    pub fields: serde_json::Value,
    pub color: &'a str,
    pub icon: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cleared optional columns must be written as `NULL`, not skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = data_types)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct DataTypeUpdate<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub frequency: &'a str,
    pub fields: serde_json::Value,
    pub color: &'a str,
    pub icon: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub data_type_id: Uuid,
    pub date: DateTime<Utc>,
    pub fields: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = entries)]
pub(crate) struct NewEntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub data_type_id: Uuid,
    pub date: DateTime<Utc>,
    pub fields: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = entries)]
pub(crate) struct EntryUpdate {
    pub date: DateTime<Utc>,
    pub fields: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}
