//! Port for entry persistence.

use async_trait::async_trait;

use crate::domain::{DataTypeId, Entry, EntryFilter, EntryId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by entry repository adapters.
    pub enum EntryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "entry repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "entry repository query failed: {message}",
        /// The referenced data type vanished before the write landed.
        MissingDataType { data_type_id: DataTypeId } =>
            "data type {data_type_id} does not exist",
    }
}

/// Storage of entry records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Entries of `owner` passing `filter`, newest `date` first.
    async fn list(
        &self,
        owner: &UserId,
        filter: &EntryFilter,
    ) -> Result<Vec<Entry>, EntryRepositoryError>;

    /// Fetch one entry.
    async fn find(
        &self,
        owner: &UserId,
        id: &EntryId,
    ) -> Result<Option<Entry>, EntryRepositoryError>;

    /// Store a new entry.
    async fn insert(&self, entry: &Entry) -> Result<(), EntryRepositoryError>;

    /// Overwrite an existing entry. Returns `false` when it no longer exists.
    async fn update(&self, entry: &Entry) -> Result<bool, EntryRepositoryError>;

    /// Remove one entry. Returns `false` when nothing was removed.
    async fn delete(&self, owner: &UserId, id: &EntryId) -> Result<bool, EntryRepositoryError>;
}
