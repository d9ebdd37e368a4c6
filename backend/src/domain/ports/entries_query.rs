//! Driving port for reading entries.

use async_trait::async_trait;

use crate::domain::{Entry, EntryFilter, EntryId, Error, UserId};

/// Read access to the entries of one owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntriesQuery: Send + Sync {
    /// Entries passing `filter`, newest `date` first.
    async fn list(&self, owner: &UserId, filter: &EntryFilter) -> Result<Vec<Entry>, Error>;

    /// One entry, or a `not_found` error.
    async fn get(&self, owner: &UserId, id: &EntryId) -> Result<Entry, Error>;
}
