//! Account registration and credential checks.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{AccountsCommand, UserRepository, UserRepositoryError};
use crate::domain::{
    Error, LoginCredentials, PasswordHash, Registration, User, UserAccount, UserId,
};

/// Account service backed by a [`UserRepository`].
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> AccountService<U> {
    /// Create a new service.
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { .. } => {
            Error::email_in_use("email is already registered")
                .with_details(json!({ "field": "email", "code": "email_in_use" }))
        }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

#[async_trait]
impl<U> AccountsCommand for AccountService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let user = User {
            id: UserId::random(),
            name: registration.name().clone(),
            email: registration.email().clone(),
            created_at: self.clock.utc(),
        };
        let password_hash = PasswordHash::generate(registration.password()).map_err(|err| {
            error!(error = %err, "password hashing failed");
            Error::internal("failed to register account")
        })?;
        let account = UserAccount {
            user: user.clone(),
            password_hash,
        };
        self.users
            .insert(&account)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let account = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_repository_error)?;
        match account {
            Some(account) if account.password_hash.verify(credentials.password()) => {
                Ok(account.user.id)
            }
            _ => {
                warn!("rejected login attempt");
                Err(invalid_credentials())
            }
        }
    }
}
