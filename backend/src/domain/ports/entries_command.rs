//! Driving port for entry mutations.

use async_trait::async_trait;

use crate::domain::{Entry, EntryDraft, EntryId, EntryPatch, Error, UserId};

/// Create, edit and delete entries of one owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntriesCommand: Send + Sync {
    /// Validate a draft against its data type and store it.
    async fn create(&self, owner: &UserId, draft: EntryDraft) -> Result<Entry, Error>;

    /// Apply `patch` to an existing entry, re-validating replaced values.
    async fn update(&self, owner: &UserId, id: &EntryId, patch: EntryPatch) -> Result<Entry, Error>;

    /// Delete one entry.
    async fn delete(&self, owner: &UserId, id: &EntryId) -> Result<(), Error>;
}
