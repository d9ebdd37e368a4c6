//! Domain ports.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters; driving
//! ports (`*Command`, `*Query`) are implemented by the domain services and
//! called by inbound adapters.

mod macros;

pub(crate) use macros::define_port_error;

mod accounts_command;
mod data_type_repository;
mod data_types_command;
mod data_types_query;
mod entries_command;
mod entries_query;
mod entry_repository;
mod user_repository;

#[cfg(test)]
pub use accounts_command::MockAccountsCommand;
pub use accounts_command::AccountsCommand;
#[cfg(test)]
pub use data_type_repository::MockDataTypeRepository;
pub use data_type_repository::{DataTypeRepository, DataTypeRepositoryError};
#[cfg(test)]
pub use data_types_command::MockDataTypesCommand;
pub use data_types_command::DataTypesCommand;
#[cfg(test)]
pub use data_types_query::MockDataTypesQuery;
pub use data_types_query::DataTypesQuery;
#[cfg(test)]
pub use entries_command::MockEntriesCommand;
pub use entries_command::EntriesCommand;
#[cfg(test)]
pub use entries_query::MockEntriesQuery;
pub use entries_query::EntriesQuery;
#[cfg(test)]
pub use entry_repository::MockEntryRepository;
pub use entry_repository::{EntryRepository, EntryRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
