//! Port through which the mirror store reaches the tracker API.

use async_trait::async_trait;

use crate::domain::ports::define_port_error;
use crate::domain::{
    DataType, DataTypeDraft, DataTypeId, DataTypePatch, Entry, EntryDraft, EntryFilter, EntryId,
    EntryPatch,
};

define_port_error! {
    /// Errors raised by remote tracker adapters.
    pub enum RemoteError {
        /// The request never produced a response.
        Transport { message: String } => "tracker request failed: {message}",
        /// The server answered with a non-success status.
        Status { status: u16, message: String } => "tracker responded {status}: {message}",
        /// The response body did not match the expected shape.
        Decode { message: String } => "tracker response could not be decoded: {message}",
    }
}

/// Data type and entry operations of the tracker API, scoped to the
/// caller's owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackerRemote: Send + Sync {
    /// Every data type of the caller.
    async fn list_data_types(&self) -> Result<Vec<DataType>, RemoteError>;

    /// Create a data type.
    async fn create_data_type(&self, draft: DataTypeDraft) -> Result<DataType, RemoteError>;

    /// Edit a data type.
    async fn update_data_type(
        &self,
        id: &DataTypeId,
        patch: DataTypePatch,
    ) -> Result<DataType, RemoteError>;

    /// Delete a data type and, server-side, its entries.
    async fn delete_data_type(&self, id: &DataTypeId) -> Result<(), RemoteError>;

    /// Entries passing `filter`, newest first.
    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>, RemoteError>;

    /// Record an entry.
    async fn create_entry(&self, draft: EntryDraft) -> Result<Entry, RemoteError>;

    /// Edit an entry.
    async fn update_entry(&self, id: &EntryId, patch: EntryPatch) -> Result<Entry, RemoteError>;

    /// Delete an entry.
    async fn delete_entry(&self, id: &EntryId) -> Result<(), RemoteError>;
}
