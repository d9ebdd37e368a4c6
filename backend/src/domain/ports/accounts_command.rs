//! Driving port for account registration and login.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

/// Account use-cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Create an account; fails with `email_in_use` when the email is taken.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Check credentials and return the account id; fails with
    /// `unauthorized` on any mismatch.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}
