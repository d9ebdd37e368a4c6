//! Entry domain service implementing the entry driving ports.
//!
//! Every write resolves the referenced data type for the same owner and runs
//! the schema validator before anything is stored.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::data_type_service::map_data_type_repository_error;
use crate::domain::ports::{
    DataTypeRepository, EntriesCommand, EntriesQuery, EntryRepository, EntryRepositoryError,
};
use crate::domain::schema_validator::violation_details;
use crate::domain::{
    DataType, DataTypeId, Entry, EntryDraft, EntryFilter, EntryId, EntryPatch, Error,
    SchemaValidationError, UserId, validate_entry_fields,
};

/// Entry service backed by entry and data type repositories.
#[derive(Clone)]
pub struct EntryService<E, D> {
    entries: Arc<E>,
    data_types: Arc<D>,
    clock: Arc<dyn Clock>,
}

impl<E, D> EntryService<E, D> {
    /// Create a new service.
    pub fn new(entries: Arc<E>, data_types: Arc<D>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries,
            data_types,
            clock,
        }
    }
}

fn map_entry_repository_error(error: EntryRepositoryError) -> Error {
    match error {
        EntryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("entry repository unavailable: {message}"))
        }
        EntryRepositoryError::Query { message } => {
            Error::internal(format!("entry repository error: {message}"))
        }
        EntryRepositoryError::MissingDataType { data_type_id } => {
            data_type_not_found(&data_type_id)
        }
    }
}

fn map_schema_error(error: SchemaValidationError) -> Error {
    Error::validation_failed("entry failed validation")
        .with_details(json!({ "violations": violation_details(&error.violations) }))
}

fn data_type_not_found(id: &DataTypeId) -> Error {
    Error::not_found(format!("data type {id} not found"))
        .with_details(json!({ "field": "dataTypeId", "code": "unknown_data_type" }))
}

fn entry_not_found(id: &EntryId) -> Error {
    Error::not_found(format!("entry {id} not found"))
}

impl<E, D> EntryService<E, D>
where
    E: EntryRepository,
    D: DataTypeRepository,
{
    async fn resolve_data_type(&self, owner: &UserId, id: &DataTypeId) -> Result<DataType, Error> {
        self.data_types
            .find(owner, id)
            .await
            .map_err(map_data_type_repository_error)?
            .ok_or_else(|| data_type_not_found(id))
    }

    async fn fetch(&self, owner: &UserId, id: &EntryId) -> Result<Entry, Error> {
        self.entries
            .find(owner, id)
            .await
            .map_err(map_entry_repository_error)?
            .ok_or_else(|| entry_not_found(id))
    }
}

#[async_trait]
impl<E, D> EntriesCommand for EntryService<E, D>
where
    E: EntryRepository,
    D: DataTypeRepository,
{
    async fn create(&self, owner: &UserId, draft: EntryDraft) -> Result<Entry, Error> {
        let data_type = self.resolve_data_type(owner, &draft.data_type_id).await?;
        let fields = validate_entry_fields(&data_type, &draft.fields).map_err(map_schema_error)?;
        let now = self.clock.utc();
        let entry = Entry {
            id: EntryId::random(),
            user_id: *owner,
            data_type_id: data_type.id,
            date: draft.date,
            fields,
            created_at: now,
            updated_at: now,
        };
        self.entries
            .insert(&entry)
            .await
            .map_err(map_entry_repository_error)?;
        info!(entry_id = %entry.id, data_type_id = %entry.data_type_id, "entry created");
        Ok(entry)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &EntryId,
        patch: EntryPatch,
    ) -> Result<Entry, Error> {
        let mut entry = self.fetch(owner, id).await?;
        if let Some(submitted) = patch.fields {
            let data_type = self.resolve_data_type(owner, &entry.data_type_id).await?;
            entry.fields = validate_entry_fields(&data_type, &submitted).map_err(map_schema_error)?;
        }
        if let Some(date) = patch.date {
            entry.date = date;
        }
        entry.updated_at = self.clock.utc();

        let stored = self
            .entries
            .update(&entry)
            .await
            .map_err(map_entry_repository_error)?;
        if !stored {
            return Err(entry_not_found(id));
        }
        info!(entry_id = %id, "entry updated");
        Ok(entry)
    }

    async fn delete(&self, owner: &UserId, id: &EntryId) -> Result<(), Error> {
        let removed = self
            .entries
            .delete(owner, id)
            .await
            .map_err(map_entry_repository_error)?;
        if !removed {
            return Err(entry_not_found(id));
        }
        info!(entry_id = %id, "entry deleted");
        Ok(())
    }
}

#[async_trait]
impl<E, D> EntriesQuery for EntryService<E, D>
where
    E: EntryRepository,
    D: DataTypeRepository,
{
    async fn list(&self, owner: &UserId, filter: &EntryFilter) -> Result<Vec<Entry>, Error> {
        debug!(?filter, "listing entries");
        self.entries
            .list(owner, filter)
            .await
            .map_err(map_entry_repository_error)
    }

    async fn get(&self, owner: &UserId, id: &EntryId) -> Result<Entry, Error> {
        self.fetch(owner, id).await
    }
}

#[cfg(test)]
#[path = "entry_service_tests.rs"]
mod tests;
