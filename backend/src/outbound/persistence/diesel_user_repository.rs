//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, PasswordHash, User, UserAccount, UserId, UserName};

use super::error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, email: Option<&str>) -> UserRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation { .. } => match email {
            Some(email) => UserRepositoryError::duplicate_email(email),
            None => UserRepositoryError::query("unique constraint violated"),
        },
        DieselFailure::ForeignKeyViolation => UserRepositoryError::query("foreign key violation"),
        DieselFailure::Connection(message) => UserRepositoryError::connection(message),
        DieselFailure::Query(message) => UserRepositoryError::query(message),
    }
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserRepositoryError> {
    let corrupted = |what: &str, err: &dyn std::fmt::Display| {
        UserRepositoryError::query(format!("invalid {what} in database: {err}"))
    };
    Ok(UserAccount {
        user: User {
            id: UserId::from_uuid(row.id),
            name: UserName::new(&row.name).map_err(|err| corrupted("name", &err))?,
            email: EmailAddress::new(&row.email).map_err(|err| corrupted("email", &err))?,
            created_at: row.created_at,
        },
        password_hash: PasswordHash::parse(&row.password_hash)
            .map_err(|err| corrupted("password hash", &err))?,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let password_hash = account.password_hash.to_stored();
        let row = NewUserRow {
            id: *account.user.id.as_uuid(),
            name: account.user.name.as_ref(),
            email: account.user.email.as_ref(),
            password_hash: &password_hash,
            created_at: account.user.created_at,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, Some(account.user.email.as_ref())))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(row_to_account).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    fn duplicate_email_is_reported() {
        let err = map_diesel_error(
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                Box::new("users_email_key".to_owned()),
            ),
            Some("ada@example.com"),
        );
        assert_eq!(err, UserRepositoryError::duplicate_email("ada@example.com"));
    }

    #[rstest]
    fn malformed_hash_is_a_query_error() {
        let row = UserRow {
            id: uuid::Uuid::new_v4(),
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password_hash: "not-a-hash".to_owned(),
            created_at: Utc::now(),
        };
        let err = row_to_account(row).expect_err("malformed hash");
        assert!(err.to_string().contains("password hash"));
    }
}
