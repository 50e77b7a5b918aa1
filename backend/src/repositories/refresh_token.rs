//! Refresh token repository for database operations
//!
//! Tokens are stored as issued (opaque random strings) in `refresh_token`,
//! linked to their owner through `user_id`.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Refresh token record from database
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RefreshTokenRecord {
    pub id: i64,
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// A token is expired from its expiry instant onwards
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Input for persisting a freshly generated token
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Persist a token; fails if the token string already exists
    async fn insert(&self, token: NewRefreshToken) -> Result<RefreshTokenRecord>;

    /// Fetch and delete a token in one atomic step
    ///
    /// Of any number of concurrent callers presenting the same token, exactly
    /// one receives `Some`; the rest see `None`.
    async fn consume(&self, token: &str) -> Result<Option<RefreshTokenRecord>>;

    /// Outstanding tokens of a user, oldest first
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<RefreshTokenRecord>>;
}

/// PostgreSQL-backed refresh token repository
#[derive(Clone)]
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn insert(&self, token: NewRefreshToken) -> Result<RefreshTokenRecord> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            INSERT INTO refresh_token (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, token, user_id, expires_at
            "#,
        )
        .bind(&token.token)
        .bind(token.user_id)
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn consume(&self, token: &str) -> Result<Option<RefreshTokenRecord>> {
        // Single statement: the row lock taken by DELETE serializes
        // concurrent redemptions of the same token
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            DELETE FROM refresh_token
            WHERE token = $1
            RETURNING id, token, user_id, expires_at
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<RefreshTokenRecord>> {
        let records = sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            SELECT id, token, user_id, expires_at
            FROM refresh_token
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
