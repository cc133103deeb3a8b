//! Users service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::domain::users::{
    data::NewUser,
    errors::UsersServiceError,
    records::{UserRecord, UserUuid},
    repository::PgUsersRepository,
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgUsersRepository::new(pool),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        if user.email.trim().is_empty() || !user.email.contains('@') {
            return Err(UsersServiceError::InvalidData);
        }

        self.repository.create_user(user).await.map_err(Into::into)
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        self.repository.get_user(user).await.map_err(Into::into)
    }
}

#[automock]
#[async_trait]
/// User account operations.
pub trait UsersService: Send + Sync {
    /// Creates a new user.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::users::records::Role, test::TestContext};

    use super::*;

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn create_user_then_get_returns_same_user() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .users
            .create_user(NewUser {
                uuid: UserUuid::new(),
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
                role: Role::Customer,
            })
            .await?;

        let fetched = ctx.users.get_user(created.uuid).await?;

        assert_eq!(fetched.uuid, created.uuid);
        assert_eq!(fetched.role, Role::Customer);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn duplicate_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        let new_user = |email: &str| NewUser {
            uuid: UserUuid::new(),
            email: email.to_string(),
            name: "Grace".to_string(),
            role: Role::Customer,
        };

        ctx.users.create_user(new_user("grace@example.com")).await?;

        let result = ctx.users.create_user(new_user("GRACE@example.com")).await;

        assert!(
            matches!(result, Err(UsersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_user_rejects_malformed_email_before_storage() {
        let pool = PgPool::connect_lazy("postgres://unused@localhost/unused")
            .expect("lazy pool should build without connecting");

        let service = PgUsersService::new(pool);

        let result = service
            .create_user(NewUser {
                uuid: UserUuid::new(),
                email: "not-an-email".to_string(),
                name: "Nobody".to_string(),
                role: Role::Customer,
            })
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }
}
