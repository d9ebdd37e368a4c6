//! In-process store implementing every repository port.
//!
//! Used when no database URL is configured and by the behaviour tests.
//! Records keep insertion order, so data types list in creation order.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    DataTypeRepository, DataTypeRepositoryError, EntryRepository, EntryRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    DataType, DataTypeId, EmailAddress, Entry, EntryFilter, EntryId, UserAccount, UserId,
    sort_newest_first,
};

#[derive(Debug, Default)]
struct StoreState {
    users: Vec<UserAccount>,
    data_types: Vec<DataType>,
    entries: Vec<Entry>,
}

/// Mutex-guarded tracker state.
#[derive(Debug, Default)]
pub struct InMemoryTrackerStore {
    state: Mutex<StoreState>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryTrackerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Option<MutexGuard<'_, StoreState>> {
        self.state.lock().ok()
    }
}

#[async_trait]
impl DataTypeRepository for InMemoryTrackerStore {
    async fn list_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<DataType>, DataTypeRepositoryError> {
        let state = self.lock().ok_or_else(|| DataTypeRepositoryError::query(POISONED))?;
        Ok(state
            .data_types
            .iter()
            .filter(|data_type| data_type.user_id == *owner)
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        owner: &UserId,
        id: &DataTypeId,
    ) -> Result<Option<DataType>, DataTypeRepositoryError> {
        let state = self.lock().ok_or_else(|| DataTypeRepositoryError::query(POISONED))?;
        Ok(state
            .data_types
            .iter()
            .find(|data_type| data_type.id == *id && data_type.user_id == *owner)
            .cloned())
    }

    async fn insert(&self, data_type: &DataType) -> Result<(), DataTypeRepositoryError> {
        let mut state = self.lock().ok_or_else(|| DataTypeRepositoryError::query(POISONED))?;
        let taken = state
            .data_types
            .iter()
            .any(|existing| {
                existing.user_id == data_type.user_id && existing.name == data_type.name
            });
        if taken {
            return Err(DataTypeRepositoryError::duplicate_name(data_type.name.as_str()));
        }
        state.data_types.push(data_type.clone());
        Ok(())
    }

    async fn update(&self, data_type: &DataType) -> Result<bool, DataTypeRepositoryError> {
        let mut state = self.lock().ok_or_else(|| DataTypeRepositoryError::query(POISONED))?;
        let taken = state.data_types.iter().any(|existing| {
            existing.id != data_type.id
                && existing.user_id == data_type.user_id
                && existing.name == data_type.name
        });
        if taken {
            return Err(DataTypeRepositoryError::duplicate_name(data_type.name.as_str()));
        }
        let slot = state
            .data_types
            .iter_mut()
            .find(|existing| existing.id == data_type.id && existing.user_id == data_type.user_id);
        Ok(match slot {
            Some(existing) => {
                *existing = data_type.clone();
                true
            }
            None => false,
        })
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: &DataTypeId,
    ) -> Result<bool, DataTypeRepositoryError> {
        let mut state = self.lock().ok_or_else(|| DataTypeRepositoryError::query(POISONED))?;
        let before = state.data_types.len();
        state
            .data_types
            .retain(|data_type| !(data_type.id == *id && data_type.user_id == *owner));
        let removed = state.data_types.len() < before;
        if removed {
            state.entries.retain(|entry| entry.data_type_id != *id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl EntryRepository for InMemoryTrackerStore {
    async fn list(
        &self,
        owner: &UserId,
        filter: &EntryFilter,
    ) -> Result<Vec<Entry>, EntryRepositoryError> {
        let state = self.lock().ok_or_else(|| EntryRepositoryError::query(POISONED))?;
        let mut matching: Vec<Entry> = state
            .entries
            .iter()
            .filter(|entry| entry.user_id == *owner && filter.matches(entry))
            .cloned()
            .collect();
        sort_newest_first(&mut matching);
        Ok(matching)
    }

    async fn find(
        &self,
        owner: &UserId,
        id: &EntryId,
    ) -> Result<Option<Entry>, EntryRepositoryError> {
        let state = self.lock().ok_or_else(|| EntryRepositoryError::query(POISONED))?;
        Ok(state
            .entries
            .iter()
            .find(|entry| entry.id == *id && entry.user_id == *owner)
            .cloned())
    }

    async fn insert(&self, entry: &Entry) -> Result<(), EntryRepositoryError> {
        let mut state = self.lock().ok_or_else(|| EntryRepositoryError::query(POISONED))?;
        if !state.data_types.iter().any(|data_type| data_type.id == entry.data_type_id) {
            return Err(EntryRepositoryError::missing_data_type(entry.data_type_id));
        }
        state.entries.push(entry.clone());
        Ok(())
    }

    async fn update(&self, entry: &Entry) -> Result<bool, EntryRepositoryError> {
        let mut state = self.lock().ok_or_else(|| EntryRepositoryError::query(POISONED))?;
        let slot = state
            .entries
            .iter_mut()
            .find(|existing| existing.id == entry.id && existing.user_id == entry.user_id);
        Ok(match slot {
            Some(existing) => {
                *existing = entry.clone();
                true
            }
            None => false,
        })
    }

    async fn delete(&self, owner: &UserId, id: &EntryId) -> Result<bool, EntryRepositoryError> {
        let mut state = self.lock().ok_or_else(|| EntryRepositoryError::query(POISONED))?;
        let before = state.entries.len();
        state
            .entries
            .retain(|entry| !(entry.id == *id && entry.user_id == *owner));
        Ok(state.entries.len() < before)
    }
}

#[async_trait]
impl UserRepository for InMemoryTrackerStore {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut state = self.lock().ok_or_else(|| UserRepositoryError::query(POISONED))?;
        if state
            .users
            .iter()
            .any(|existing| existing.user.email == account.user.email)
        {
            return Err(UserRepositoryError::duplicate_email(account.user.email.as_ref()));
        }
        state.users.push(account.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let state = self.lock().ok_or_else(|| UserRepositoryError::query(POISONED))?;
        Ok(state
            .users
            .iter()
            .find(|account| account.user.email == *email)
            .cloned())
    }
}
