//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin translators between Diesel row structs and domain
//! types; no business rules live here. Connections come from a `bb8` pool
//! through `diesel-async`, and schema migrations are embedded in the binary.
//!
//! ```ignore
//! use tracker::outbound::persistence::{DbPool, DieselDataTypeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/tracker")).await?;
//! let data_types = DieselDataTypeRepository::new(pool);
//! ```

mod diesel_data_type_repository;
mod diesel_entry_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_data_type_repository::DieselDataTypeRepository;
pub use diesel_entry_repository::DieselEntryRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
