//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use crate::domain::UserId;
use crate::domain::test_support::fixture_clock;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryTrackerStore;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler state backed by a fresh in-memory store and the fixture clock.
pub fn memory_state(default_owner: Option<UserId>) -> HttpState {
    let store = Arc::new(InMemoryTrackerStore::new());
    HttpState::new(HttpStatePorts::from_repositories(
        store.clone(),
        store.clone(),
        store,
        fixture_clock(),
    ))
    .with_default_owner(default_owner)
}
