//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they can be exercised with mocks or the in-memory store.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AccountsCommand, DataTypeRepository, DataTypesCommand, DataTypesQuery, EntriesCommand,
    EntriesQuery, EntryRepository, UserRepository,
};
use crate::domain::{AccountService, DataTypeService, EntryService, UserId};

/// Port implementations bundled for [`HttpState::new`].
#[derive(Clone)]
pub struct HttpStatePorts {
    pub data_types: Arc<dyn DataTypesCommand>,
    pub data_types_query: Arc<dyn DataTypesQuery>,
    pub entries: Arc<dyn EntriesCommand>,
    pub entries_query: Arc<dyn EntriesQuery>,
    pub accounts: Arc<dyn AccountsCommand>,
}

impl HttpStatePorts {
    /// Wire the domain services over one set of repositories.
    pub fn from_repositories<D, E, U>(
        data_types: Arc<D>,
        entries: Arc<E>,
        users: Arc<U>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        D: DataTypeRepository + 'static,
        E: EntryRepository + 'static,
        U: UserRepository + 'static,
    {
        let data_type_service = Arc::new(DataTypeService::new(data_types.clone(), clock.clone()));
        let entry_service = Arc::new(EntryService::new(entries, data_types, clock.clone()));
        Self {
            data_types: data_type_service.clone(),
            data_types_query: data_type_service,
            entries: entry_service.clone(),
            entries_query: entry_service,
            accounts: Arc::new(AccountService::new(users, clock)),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub data_types: Arc<dyn DataTypesCommand>,
    pub data_types_query: Arc<dyn DataTypesQuery>,
    pub entries: Arc<dyn EntriesCommand>,
    pub entries_query: Arc<dyn EntriesQuery>,
    pub accounts: Arc<dyn AccountsCommand>,
    /// Owner used for requests without a session.
    pub default_owner: Option<UserId>,
}

impl HttpState {
    /// Build state that requires a session on every resource request.
    pub fn new(ports: HttpStatePorts) -> Self {
        Self {
            data_types: ports.data_types,
            data_types_query: ports.data_types_query,
            entries: ports.entries,
            entries_query: ports.entries_query,
            accounts: ports.accounts,
            default_owner: None,
        }
    }

    /// Fall back to `owner` when a request carries no session.
    pub fn with_default_owner(mut self, owner: Option<UserId>) -> Self {
        self.default_owner = owner;
        self
    }
}
