//! PostgreSQL-backed `DataTypeRepository`.
//!
//! Field definitions live in a JSONB column. Entry removal on delete is left
//! to the `ON DELETE CASCADE` foreign key of the `entries` table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{DataTypeRepository, DataTypeRepositoryError};
use crate::domain::{DataType, DataTypeId, FieldDefinition, Frequency, UserId};

use super::error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{DataTypeRow, DataTypeUpdate, NewDataTypeRow};
use super::pool::{DbPool, PoolError};
use super::schema::data_types;

/// Diesel implementation of [`DataTypeRepository`].
#[derive(Clone)]
pub struct DieselDataTypeRepository {
    pool: DbPool,
}

impl DieselDataTypeRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DataTypeRepositoryError {
    DataTypeRepositoryError::connection(error.into_message())
}

/// `name` is reported when the write collides with an existing data type.
fn map_diesel_error(error: diesel::result::Error, name: Option<&str>) -> DataTypeRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation { .. } => match name {
            Some(name) => DataTypeRepositoryError::duplicate_name(name),
            None => DataTypeRepositoryError::query("unique constraint violated"),
        },
        DieselFailure::ForeignKeyViolation => {
            DataTypeRepositoryError::query("foreign key violation")
        }
        DieselFailure::Connection(message) => DataTypeRepositoryError::connection(message),
        DieselFailure::Query(message) => DataTypeRepositoryError::query(message),
    }
}

fn encode_fields(fields: &[FieldDefinition]) -> Result<serde_json::Value, DataTypeRepositoryError> {
    serde_json::to_value(fields)
        .map_err(|err| DataTypeRepositoryError::query(format!("failed to encode fields: {err}")))
}

fn row_to_data_type(row: DataTypeRow) -> Result<DataType, DataTypeRepositoryError> {
    let frequency = Frequency::parse(&row.frequency).ok_or_else(|| {
        warn!(data_type_id = %row.id, value = %row.frequency, "unrecognised frequency in database");
        DataTypeRepositoryError::query(format!("invalid frequency in database: {}", row.frequency))
    })?;
    let fields: Vec<FieldDefinition> = serde_json::from_value(row.fields).map_err(|err| {
        DataTypeRepositoryError::query(format!("corrupted field definitions in database: {err}"))
    })?;
    Ok(DataType {
        id: DataTypeId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        name: row.name,
        description: row.description,
        frequency,
        fields,
        color: row.color,
        icon: row.icon,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl DataTypeRepository for DieselDataTypeRepository {
    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<DataType>, DataTypeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DataTypeRow> = data_types::table
            .filter(data_types::user_id.eq(owner.as_uuid()))
            .order((data_types::created_at.asc(), data_types::id.asc()))
            .select(DataTypeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        rows.into_iter().map(row_to_data_type).collect()
    }

    async fn find(
        &self,
        owner: &UserId,
        id: &DataTypeId,
    ) -> Result<Option<DataType>, DataTypeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DataTypeRow> = data_types::table
            .filter(data_types::id.eq(id.as_uuid()))
            .filter(data_types::user_id.eq(owner.as_uuid()))
            .select(DataTypeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(row_to_data_type).transpose()
    }

    async fn insert(&self, data_type: &DataType) -> Result<(), DataTypeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewDataTypeRow {
            id: *data_type.id.as_uuid(),
            user_id: *data_type.user_id.as_uuid(),
            name: &data_type.name,
            description: data_type.description.as_deref(),
            frequency: data_type.frequency.as_str(),
            fields: encode_fields(&data_type.fields)?,
            color: &data_type.color,
            icon: data_type.icon.as_deref(),
            created_at: data_type.created_at,
            updated_at: data_type.updated_at,
        };
        diesel::insert_into(data_types::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, Some(&data_type.name)))
    }

    async fn update(&self, data_type: &DataType) -> Result<bool, DataTypeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = DataTypeUpdate {
            name: &data_type.name,
            description: data_type.description.as_deref(),
            frequency: data_type.frequency.as_str(),
            fields: encode_fields(&data_type.fields)?,
            color: &data_type.color,
            icon: data_type.icon.as_deref(),
            updated_at: data_type.updated_at,
        };
        let updated = diesel::update(data_types::table)
            .filter(data_types::id.eq(data_type.id.as_uuid()))
            .filter(data_types::user_id.eq(data_type.user_id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(&data_type.name)))?;
        Ok(updated > 0)
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: &DataTypeId,
    ) -> Result<bool, DataTypeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            data_types::table
                .filter(data_types::id.eq(id.as_uuid()))
                .filter(data_types::user_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, None))?;
        Ok(deleted > 0)
    }
}
