//! Port for data type persistence.

use async_trait::async_trait;

use crate::domain::{DataType, DataTypeId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by data type repository adapters.
    pub enum DataTypeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "data type repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "data type repository query failed: {message}",
        /// The owner already has a data type with this name.
        DuplicateName { name: String } =>
            "a data type named {name} already exists",
    }
}

/// Storage of data type definitions.
///
/// Every lookup is scoped to an owner; a data type owned by someone else is
/// indistinguishable from a missing one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataTypeRepository: Send + Sync {
    /// All data types of `owner`, in creation order.
    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<DataType>, DataTypeRepositoryError>;

    /// Fetch one data type.
    async fn find(
        &self,
        owner: &UserId,
        id: &DataTypeId,
    ) -> Result<Option<DataType>, DataTypeRepositoryError>;

    /// Store a new data type.
    ///
    /// Fails with [`DataTypeRepositoryError::DuplicateName`] when the owner
    /// already has one with the same name.
    async fn insert(&self, data_type: &DataType) -> Result<(), DataTypeRepositoryError>;

    /// Overwrite an existing data type. Returns `false` when it no longer
    /// exists.
    async fn update(&self, data_type: &DataType) -> Result<bool, DataTypeRepositoryError>;

    /// Remove a data type together with every entry that references it.
    /// Returns `false` when nothing was removed.
    async fn delete(
        &self,
        owner: &UserId,
        id: &DataTypeId,
    ) -> Result<bool, DataTypeRepositoryError>;
}
