//! Client-side cache of the caller's data types and entries.
//!
//! The store mirrors server state: every mutation goes to the remote first
//! and the cache is patched only once the remote accepts it. Range and
//! per-type queries bypass the cache and always ask the remote.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use super::remote::{RemoteError, TrackerRemote};
use crate::domain::{
    DataType, DataTypeDraft, DataTypeId, DataTypePatch, Entry, EntryDraft, EntryFilter, EntryId,
    EntryPatch,
};

/// Lifecycle of a [`MirrorStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorState {
    /// Nothing fetched yet.
    Loading,
    /// Both collections are cached.
    Ready,
    /// The initial fetch failed; only a fresh store recovers.
    Failed(String),
}

/// Errors returned by mirror operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MirrorError {
    /// A mutation was attempted before [`MirrorStore::initialize`] succeeded.
    #[error("mirror store has not been initialised")]
    NotReady,
    /// The store is stuck after a failed initial fetch.
    #[error("mirror store failed to load: {message}")]
    Failed { message: String },
    /// The remote rejected the operation.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// In-memory mirror of one owner's tracker data.
pub struct MirrorStore<R> {
    remote: R,
    state: MirrorState,
    data_types: Vec<DataType>,
    entries: Vec<Entry>,
    last_error: Option<String>,
}

impl<R: TrackerRemote> MirrorStore<R> {
    /// Empty store in the [`MirrorState::Loading`] state.
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            state: MirrorState::Loading,
            data_types: Vec::new(),
            entries: Vec::new(),
            last_error: None,
        }
    }

    /// Fetch every data type and entry.
    ///
    /// Either both collections load or neither does: a failure empties the
    /// cache and moves the store to [`MirrorState::Failed`] for good.
    pub async fn initialize(&mut self) -> Result<(), MirrorError> {
        if let MirrorState::Failed(message) = &self.state {
            return Err(MirrorError::Failed {
                message: message.clone(),
            });
        }
        match self.fetch_all().await {
            Ok((data_types, entries)) => {
                self.data_types = data_types;
                self.entries = entries;
                self.state = MirrorState::Ready;
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                warn!(error = %message, "mirror store failed to load");
                self.data_types.clear();
                self.entries.clear();
                self.state = MirrorState::Failed(message.clone());
                self.last_error = Some(message);
                Err(err.into())
            }
        }
    }

    async fn fetch_all(&self) -> Result<(Vec<DataType>, Vec<Entry>), RemoteError> {
        let data_types = self.remote.list_data_types().await?;
        let entries = self.remote.list_entries(&EntryFilter::default()).await?;
        Ok((data_types, entries))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &MirrorState {
        &self.state
    }

    /// Cached data types in server order.
    pub fn data_types(&self) -> &[DataType] {
        &self.data_types
    }

    /// Cached entries in server order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Message of the most recent failed operation, cleared by the next
    /// success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Create a data type and append it to the cache.
    pub async fn add_data_type(&mut self, draft: DataTypeDraft) -> Result<DataType, MirrorError> {
        self.ensure_ready()?;
        let result = self.remote.create_data_type(draft).await;
        let created = self.settle(result)?;
        self.data_types.push(created.clone());
        Ok(created)
    }

    /// Edit a data type and replace the cached copy.
    pub async fn update_data_type(
        &mut self,
        id: &DataTypeId,
        patch: DataTypePatch,
    ) -> Result<DataType, MirrorError> {
        self.ensure_ready()?;
        let result = self.remote.update_data_type(id, patch).await;
        let updated = self.settle(result)?;
        if let Some(slot) = self.data_types.iter_mut().find(|dt| dt.id == updated.id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Delete a data type and drop it and its entries from the cache.
    pub async fn delete_data_type(&mut self, id: &DataTypeId) -> Result<(), MirrorError> {
        self.ensure_ready()?;
        let result = self.remote.delete_data_type(id).await;
        self.settle(result)?;
        self.data_types.retain(|dt| dt.id != *id);
        self.entries.retain(|entry| entry.data_type_id != *id);
        Ok(())
    }

    /// Record an entry and append it to the cache.
    pub async fn add_entry(&mut self, draft: EntryDraft) -> Result<Entry, MirrorError> {
        self.ensure_ready()?;
        let result = self.remote.create_entry(draft).await;
        let created = self.settle(result)?;
        self.entries.push(created.clone());
        Ok(created)
    }

    /// Edit an entry and replace the cached copy.
    pub async fn update_entry(
        &mut self,
        id: &EntryId,
        patch: EntryPatch,
    ) -> Result<Entry, MirrorError> {
        self.ensure_ready()?;
        let result = self.remote.update_entry(id, patch).await;
        let updated = self.settle(result)?;
        if let Some(slot) = self.entries.iter_mut().find(|entry| entry.id == updated.id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Delete an entry and drop it from the cache.
    pub async fn delete_entry(&mut self, id: &EntryId) -> Result<(), MirrorError> {
        self.ensure_ready()?;
        let result = self.remote.delete_entry(id).await;
        self.settle(result)?;
        self.entries.retain(|entry| entry.id != *id);
        Ok(())
    }

    /// Entries dated within one UTC day, fetched from the remote.
    pub async fn entries_by_date(&mut self, day: NaiveDate) -> Result<Vec<Entry>, MirrorError> {
        self.query(EntryFilter::for_day(day)).await
    }

    /// Entries dated within `[start, end]`, fetched from the remote.
    pub async fn entries_by_date_range(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Entry>, MirrorError> {
        self.query(EntryFilter {
            data_type_id: None,
            start: Some(start),
            end: Some(end),
        })
        .await
    }

    /// Entries of one data type, fetched from the remote.
    pub async fn entries_by_data_type(
        &mut self,
        id: &DataTypeId,
    ) -> Result<Vec<Entry>, MirrorError> {
        self.query(EntryFilter {
            data_type_id: Some(*id),
            ..EntryFilter::default()
        })
        .await
    }

    async fn query(&mut self, filter: EntryFilter) -> Result<Vec<Entry>, MirrorError> {
        let result = self.remote.list_entries(&filter).await;
        self.settle(result)
    }

    fn ensure_ready(&self) -> Result<(), MirrorError> {
        match &self.state {
            MirrorState::Ready => Ok(()),
            MirrorState::Loading => Err(MirrorError::NotReady),
            MirrorState::Failed(message) => Err(MirrorError::Failed {
                message: message.clone(),
            }),
        }
    }

    fn settle<T>(&mut self, result: Result<T, RemoteError>) -> Result<T, MirrorError> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, "tracker remote call failed");
                self.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "mirror_tests.rs"]
mod tests;
