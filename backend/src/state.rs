//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Pre-compute expensive resources**: JWT keys and the DB pool are created once
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Immutable after creation**: State is read-only during request handling

use crate::auth::{JwtService, PasswordService, RefreshTokenStore};
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::repositories::{
    InMemoryRefreshTokenRepository, InMemoryUserRepository, PgRefreshTokenRepository,
    PgUserRepository, RefreshTokenRepository, UserRepository,
};
use crate::services::{AuthService, UserService};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// # Performance
///
/// - `config`: Wrapped in Arc, cloning is O(1)
/// - `auth`: Pre-computed JWT keys and repositories behind Arc, cloning is O(1)
/// - `clock`: Trait object behind Arc
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Login, refresh and bearer checks
    pub auth: AuthService,
    /// Account creation and listing
    pub users: UserService,
    /// Time source for token issuance and expiry
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create the production state backed by PostgreSQL
    ///
    /// # Note
    /// This pre-computes JWT keys from the config secret, so it should only
    /// be called once at application startup.
    pub fn new(db: PgPool, config: AppConfig) -> Result<Self> {
        Self::with_repositories(
            config,
            Arc::new(PgUserRepository::new(db.clone())),
            Arc::new(PgRefreshTokenRepository::new(db)),
            Arc::new(SystemClock),
        )
    }

    /// State backed by in-memory repositories
    pub fn in_memory(config: AppConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        Self::with_repositories(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryRefreshTokenRepository::new()),
            clock,
        )
    }

    /// Wire services over arbitrary repositories and clock
    pub fn with_repositories(
        config: AppConfig,
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let jwt = JwtService::from_config(&config.jwt)?;
        let passwords = PasswordService::from_config(&config.password);
        let store = RefreshTokenStore::new(refresh_tokens, config.jwt.refresh_token_expiry_secs);

        Ok(Self {
            auth: AuthService::new(Arc::clone(&users), store, jwt),
            users: UserService::new(users, passwords),
            config: Arc::new(config),
            clock,
        })
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    #[inline]
    pub fn users(&self) -> &UserService {
        &self.users
    }

    /// Current time according to the state's clock
    #[inline]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
