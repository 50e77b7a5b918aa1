//! In-memory repositories
//!
//! Same contracts as the PostgreSQL repositories, backed by maps behind tokio
//! locks. Used by the test suites and handy for running the service without
//! a database.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::refresh_token::{NewRefreshToken, RefreshTokenRecord, RefreshTokenRepository};
use super::user::{NewUser, UserRecord, UserRepository};

/// In-memory user store keyed by id
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<UserRecord> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            bail!("duplicate email: {}", user.email);
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            email: user.email,
            hashed_password: user.hashed_password,
            is_admin: user.is_admin,
            full_name: user.full_name,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.users.read().await.values().any(|u| u.email == email))
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<(Vec<UserRecord>, i64)> {
        let users = self.users.read().await;
        let mut all: Vec<UserRecord> = users.values().cloned().collect();
        all.sort_by(|a, b| a.email.cmp(&b.email));

        let count = all.len() as i64;
        let page = all
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, count))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// In-memory refresh token store keyed by token string
pub struct InMemoryRefreshTokenRepository {
    tokens: Mutex<HashMap<String, RefreshTokenRecord>>,
    next_id: AtomicI64,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of outstanding tokens across all users
    pub async fn len(&self) -> usize {
        self.tokens.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryRefreshTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn insert(&self, token: NewRefreshToken) -> Result<RefreshTokenRecord> {
        let mut tokens = self.tokens.lock().await;
        if tokens.contains_key(&token.token) {
            bail!("duplicate refresh token");
        }

        let record = RefreshTokenRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            token: token.token,
            user_id: token.user_id,
            expires_at: token.expires_at,
        };
        tokens.insert(record.token.clone(), record.clone());
        Ok(record)
    }

    async fn consume(&self, token: &str) -> Result<Option<RefreshTokenRecord>> {
        Ok(self.tokens.lock().await.remove(token))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<RefreshTokenRecord>> {
        let tokens = self.tokens.lock().await;
        let mut records: Vec<RefreshTokenRecord> = tokens
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}
