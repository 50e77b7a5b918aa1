//! User service for account creation and lookup
//!
//! # Performance Optimizations
//!
//! - Password hashing runs on the blocking thread pool
//! - The repository is shared behind an `Arc`, so the service is cheap to clone

use crate::auth::PasswordService;
use crate::error::{ApiError, ApiResult};
use crate::repositories::{NewUser, UserRecord, UserRepository};
use auth_shared::validation::{validate_email, validate_full_name, validate_password};
use auth_shared::{ListParams, UserPublic, UsersPublic};
use std::sync::Arc;
use tracing::info;

/// Input for [`UserService::create_user`]
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub is_admin: bool,
    pub full_name: Option<String>,
}

/// User service over the credential store
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    passwords: PasswordService,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: PasswordService) -> Self {
        Self { users, passwords }
    }

    /// Create a user with a freshly hashed password
    ///
    /// # Performance
    /// Password hashing is offloaded to blocking thread pool via `spawn_blocking`.
    pub async fn create_user(&self, input: CreateUser) -> ApiResult<UserRecord> {
        validate_email(&input.email)?;
        validate_password(&input.password)?;
        validate_full_name(input.full_name.as_deref())?;

        if self.users.email_exists(&input.email).await? {
            return Err(ApiError::Conflict(
                "The user with this email already exists in the system".to_string(),
            ));
        }

        let hashed_password = self.passwords.hash_async(input.password).await?;

        let user = self
            .users
            .create(NewUser {
                email: input.email,
                hashed_password,
                is_admin: input.is_admin,
                full_name: input.full_name,
            })
            .await?;

        info!(user_id = %user.id, is_admin = user.is_admin, "User created");
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<UserRecord>> {
        Ok(self.users.find_by_email(email).await?)
    }

    /// Page through users ordered by email
    ///
    /// Negative offsets are treated as zero and the page size is capped at
    /// [`ListParams::MAX_LIMIT`].
    pub async fn list_users(&self, params: ListParams) -> ApiResult<UsersPublic> {
        let skip = params.skip.max(0);
        let limit = params.limit.clamp(0, ListParams::MAX_LIMIT);

        let (users, count) = self.users.list(skip, limit).await?;
        Ok(UsersPublic {
            data: users.into_iter().map(UserPublic::from).collect(),
            count,
        })
    }

    /// Check that the credential store is reachable
    pub async fn ping(&self) -> anyhow::Result<()> {
        self.users.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PasswordScheme;
    use crate::repositories::InMemoryUserRepository;

    fn service() -> UserService {
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            PasswordService::new(PasswordScheme::Bcrypt, 4),
        )
    }

    fn input(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password: "correct-horse".to_string(),
            is_admin: false,
            full_name: Some("Test User".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let service = service();
        let user = service.create_user(input("user@example.com")).await.unwrap();

        assert_ne!(user.hashed_password, "correct-horse");
        assert!(PasswordService::verify("correct-horse", &user.hashed_password));
        assert_eq!(user.full_name.as_deref(), Some("Test User"));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let service = service();
        service.create_user(input("dup@example.com")).await.unwrap();

        let result = service.create_user(input("dup@example.com")).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let service = service();

        let result = service.create_user(input("not-an-email")).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let mut short = input("short@example.com");
        short.password = "short".to_string();
        let result = service.create_user(short).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_users_clamps_params() {
        let service = service();
        for email in ["b@example.com", "a@example.com"] {
            service.create_user(input(email)).await.unwrap();
        }

        let page = service
            .list_users(ListParams {
                skip: -5,
                limit: 10_000,
            })
            .await
            .unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.data[0].email, "a@example.com");
        assert_eq!(page.data[1].email, "b@example.com");
    }
}
