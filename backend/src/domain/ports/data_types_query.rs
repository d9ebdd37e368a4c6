//! Driving port for reading data type definitions.

use async_trait::async_trait;

use crate::domain::{DataType, DataTypeId, Error, UserId};

/// Read access to the data types of one owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataTypesQuery: Send + Sync {
    /// Every data type of `owner`.
    async fn list(&self, owner: &UserId) -> Result<Vec<DataType>, Error>;

    /// One data type, or a `not_found` error.
    async fn get(&self, owner: &UserId, id: &DataTypeId) -> Result<DataType, Error>;
}
