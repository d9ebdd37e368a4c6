//! Driving port for data type mutations.
//!
//! Inbound adapters call this port; they never see repositories directly.

use async_trait::async_trait;

use crate::domain::{DataType, DataTypeDraft, DataTypeId, DataTypePatch, Error, UserId};

/// Create, edit and delete data type definitions of one owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataTypesCommand: Send + Sync {
    /// Validate, normalise and store a new data type.
    async fn create(&self, owner: &UserId, draft: DataTypeDraft) -> Result<DataType, Error>;

    /// Merge `patch` into an existing data type and store the result.
    async fn update(
        &self,
        owner: &UserId,
        id: &DataTypeId,
        patch: DataTypePatch,
    ) -> Result<DataType, Error>;

    /// Delete a data type and every entry that references it.
    async fn delete(&self, owner: &UserId, id: &DataTypeId) -> Result<(), Error>;
}
