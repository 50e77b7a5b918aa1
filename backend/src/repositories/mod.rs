//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod memory;
pub mod refresh_token;
pub mod user;

pub use memory::{InMemoryRefreshTokenRepository, InMemoryUserRepository};
pub use refresh_token::{
    NewRefreshToken, PgRefreshTokenRepository, RefreshTokenRecord, RefreshTokenRepository,
};
pub use user::{NewUser, PgUserRepository, UserRecord, UserRepository};
