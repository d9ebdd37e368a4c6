//! PostgreSQL-backed `EntryRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EntryRepository, EntryRepositoryError};
use crate::domain::{DataTypeId, Entry, EntryField, EntryFilter, EntryId, UserId};

use super::error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{EntryRow, EntryUpdate, NewEntryRow};
use super::pool::{DbPool, PoolError};
use super::schema::entries;

/// Diesel implementation of [`EntryRepository`].
#[derive(Clone)]
pub struct DieselEntryRepository {
    pool: DbPool,
}

impl DieselEntryRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EntryRepositoryError {
    EntryRepositoryError::connection(error.into_message())
}

/// `data_type_id` is reported when the write references a missing data type.
fn map_diesel_error(
    error: diesel::result::Error,
    data_type_id: Option<DataTypeId>,
) -> EntryRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::ForeignKeyViolation => match data_type_id {
            Some(id) => EntryRepositoryError::missing_data_type(id),
            None => EntryRepositoryError::query("foreign key violation"),
        },
        DieselFailure::UniqueViolation { .. } => {
            EntryRepositoryError::query("unique constraint violated")
        }
        DieselFailure::Connection(message) => EntryRepositoryError::connection(message),
        DieselFailure::Query(message) => EntryRepositoryError::query(message),
    }
}

fn encode_fields(fields: &[EntryField]) -> Result<serde_json::Value, EntryRepositoryError> {
    serde_json::to_value(fields)
        .map_err(|err| EntryRepositoryError::query(format!("failed to encode entry fields: {err}")))
}

fn row_to_entry(row: EntryRow) -> Result<Entry, EntryRepositoryError> {
    let fields: Vec<EntryField> = serde_json::from_value(row.fields).map_err(|err| {
        EntryRepositoryError::query(format!("corrupted entry fields in database: {err}"))
    })?;
    Ok(Entry {
        id: EntryId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        data_type_id: DataTypeId::from_uuid(row.data_type_id),
        date: row.date,
        fields,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl EntryRepository for DieselEntryRepository {
    async fn list(
        &self,
        owner: &UserId,
        filter: &EntryFilter,
    ) -> Result<Vec<Entry>, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = entries::table
            .filter(entries::user_id.eq(*owner.as_uuid()))
            .select(EntryRow::as_select())
            .into_boxed();
        if let Some(data_type_id) = filter.data_type_id {
            query = query.filter(entries::data_type_id.eq(*data_type_id.as_uuid()));
        }
        if let Some(start) = filter.start {
            query = query.filter(entries::date.ge(start));
        }
        if let Some(end) = filter.end {
            query = query.filter(entries::date.le(end));
        }
        let rows: Vec<EntryRow> = query
            .order((entries::date.desc(), entries::created_at.desc()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        rows.into_iter().map(row_to_entry).collect()
    }

    async fn find(
        &self,
        owner: &UserId,
        id: &EntryId,
    ) -> Result<Option<Entry>, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EntryRow> = entries::table
            .filter(entries::id.eq(id.as_uuid()))
            .filter(entries::user_id.eq(owner.as_uuid()))
            .select(EntryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(row_to_entry).transpose()
    }

    async fn insert(&self, entry: &Entry) -> Result<(), EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewEntryRow {
            id: *entry.id.as_uuid(),
            user_id: *entry.user_id.as_uuid(),
            data_type_id: *entry.data_type_id.as_uuid(),
            date: entry.date,
            fields: encode_fields(&entry.fields)?,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        };
        diesel::insert_into(entries::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, Some(entry.data_type_id)))
    }

    async fn update(&self, entry: &Entry) -> Result<bool, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = EntryUpdate {
            date: entry.date,
            fields: encode_fields(&entry.fields)?,
            updated_at: entry.updated_at,
        };
        let updated = diesel::update(entries::table)
            .filter(entries::id.eq(entry.id.as_uuid()))
            .filter(entries::user_id.eq(entry.user_id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(entry.data_type_id)))?;
        Ok(updated > 0)
    }

    async fn delete(&self, owner: &UserId, id: &EntryId) -> Result<bool, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            entries::table
                .filter(entries::id.eq(id.as_uuid()))
                .filter(entries::user_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, None))?;
        Ok(deleted > 0)
    }
}
