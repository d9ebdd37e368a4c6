//! Builders for the shared HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use tracker::inbound::http::state::{HttpState, HttpStatePorts};
use tracker::outbound::memory::InMemoryTrackerStore;
use tracker::outbound::persistence::{
    DbPool, DieselDataTypeRepository, DieselEntryRepository, DieselUserRepository,
};

use super::ServerConfig;

fn diesel_ports(pool: &DbPool) -> HttpStatePorts {
    HttpStatePorts::from_repositories(
        Arc::new(DieselDataTypeRepository::new(pool.clone())),
        Arc::new(DieselEntryRepository::new(pool.clone())),
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DefaultClock),
    )
}

fn memory_ports() -> HttpStatePorts {
    let store = Arc::new(InMemoryTrackerStore::new());
    HttpStatePorts::from_repositories(store.clone(), store.clone(), store, Arc::new(DefaultClock))
}

/// Build the shared HTTP state, backed by PostgreSQL when a pool is
/// configured and by a process-local store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => diesel_ports(pool),
        None => {
            info!("no database configured; data is kept in memory");
            memory_ports()
        }
    };
    web::Data::new(HttpState::new(ports).with_default_owner(config.default_owner))
}
