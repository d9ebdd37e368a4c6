//! Data type domain service implementing the data type driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    DataTypeRepository, DataTypeRepositoryError, DataTypesCommand, DataTypesQuery,
};
use crate::domain::schema_validator::violation_details;
use crate::domain::{
    DataType, DataTypeDraft, DataTypeId, DataTypePatch, DefinitionError, Error, UserId,
};

/// Data type service backed by a [`DataTypeRepository`].
#[derive(Clone)]
pub struct DataTypeService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> DataTypeService<R> {
    /// Create a new service over `repo`, stamping times from `clock`.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

pub(crate) fn map_data_type_repository_error(error: DataTypeRepositoryError) -> Error {
    match error {
        DataTypeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("data type repository unavailable: {message}"))
        }
        DataTypeRepositoryError::Query { message } => {
            Error::internal(format!("data type repository error: {message}"))
        }
        DataTypeRepositoryError::DuplicateName { name } => {
            Error::duplicate_name(format!("a data type named \"{name}\" already exists"))
                .with_details(json!({ "field": "name", "code": "duplicate_name" }))
        }
    }
}

fn map_definition_error(error: DefinitionError) -> Error {
    Error::validation_failed("data type definition is invalid")
        .with_details(json!({ "violations": violation_details(&error.violations) }))
}

fn data_type_not_found(id: &DataTypeId) -> Error {
    Error::not_found(format!("data type {id} not found"))
}

impl<R> DataTypeService<R>
where
    R: DataTypeRepository,
{
    async fn fetch(&self, owner: &UserId, id: &DataTypeId) -> Result<DataType, Error> {
        self.repo
            .find(owner, id)
            .await
            .map_err(map_data_type_repository_error)?
            .ok_or_else(|| data_type_not_found(id))
    }
}

#[async_trait]
impl<R> DataTypesCommand for DataTypeService<R>
where
    R: DataTypeRepository,
{
    async fn create(&self, owner: &UserId, draft: DataTypeDraft) -> Result<DataType, Error> {
        let content = draft.validate().map_err(map_definition_error)?;
        let now = self.clock.utc();
        let data_type = content.into_data_type(DataTypeId::random(), *owner, now, now);
        self.repo
            .insert(&data_type)
            .await
            .map_err(map_data_type_repository_error)?;
        info!(
            data_type_id = %data_type.id,
            owner = %owner,
            fields = data_type.fields.len(),
            "data type created"
        );
        Ok(data_type)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &DataTypeId,
        patch: DataTypePatch,
    ) -> Result<DataType, Error> {
        let current = self.fetch(owner, id).await?;
        let content = patch
            .apply_to(&current)
            .validate()
            .map_err(map_definition_error)?;
        let updated =
            content.into_data_type(current.id, *owner, current.created_at, self.clock.utc());
        let stored = self
            .repo
            .update(&updated)
            .await
            .map_err(map_data_type_repository_error)?;
        if !stored {
            return Err(data_type_not_found(id));
        }
        info!(data_type_id = %id, owner = %owner, "data type updated");
        Ok(updated)
    }

    async fn delete(&self, owner: &UserId, id: &DataTypeId) -> Result<(), Error> {
        let removed = self
            .repo
            .delete(owner, id)
            .await
            .map_err(map_data_type_repository_error)?;
        if !removed {
            return Err(data_type_not_found(id));
        }
        info!(data_type_id = %id, owner = %owner, "data type and its entries deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> DataTypesQuery for DataTypeService<R>
where
    R: DataTypeRepository,
{
    async fn list(&self, owner: &UserId) -> Result<Vec<DataType>, Error> {
        self.repo
            .list_for_owner(owner)
            .await
            .map_err(map_data_type_repository_error)
    }

    async fn get(&self, owner: &UserId, id: &DataTypeId) -> Result<DataType, Error> {
        self.fetch(owner, id).await
    }
}

#[cfg(test)]
#[path = "data_type_service_tests.rs"]
mod tests;
