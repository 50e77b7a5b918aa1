//! User repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use auth_shared::UserPublic;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub is_admin: bool,
    pub full_name: Option<String>,
}

impl From<UserRecord> for UserPublic {
    fn from(user: UserRecord) -> Self {
        UserPublic {
            id: user.id,
            email: user.email,
            is_admin: user.is_admin,
            full_name: user.full_name,
        }
    }
}

/// Input for creating a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub is_admin: bool,
    pub full_name: Option<String>,
}

/// Credential store
///
/// Email lookups are exact: emails are case-sensitive as stored.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user; fails if the email is already taken
    async fn create(&self, user: NewUser) -> Result<UserRecord>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>>;

    /// Check if email exists
    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Page of users ordered by email, with the total count
    async fn list(&self, skip: i64, limit: i64) -> Result<(Vec<UserRecord>, i64)>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> Result<()>;
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO "user" (id, email, hashed_password, is_admin, full_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, hashed_password, is_admin, full_name
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(user.is_admin)
        .bind(&user.full_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, hashed_password, is_admin, full_name
            FROM "user"
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, hashed_password, is_admin, full_name
            FROM "user"
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM "user" WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<(Vec<UserRecord>, i64)> {
        let users = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, hashed_password, is_admin, full_name
            FROM "user"
            ORDER BY email
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let count = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM "user""#)
            .fetch_one(&self.pool)
            .await?;

        Ok((users, count))
    }

    async fn ping(&self) -> Result<()> {
        db::health_check(&self.pool).await
    }
}
