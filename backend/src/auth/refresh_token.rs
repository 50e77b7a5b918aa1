//! Opaque refresh tokens
//!
//! A refresh token is 64 bytes from the OS random source, encoded as
//! unpadded URL-safe base64. Each token is persisted with its owner and an
//! absolute expiry, and is redeemed at most once.

use anyhow::Result;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use std::sync::Arc;
use uuid::Uuid;

use crate::repositories::{NewRefreshToken, RefreshTokenRecord, RefreshTokenRepository};

/// Entropy of a refresh token in bytes
pub const REFRESH_TOKEN_BYTES: usize = 64;

/// Generate a URL-safe random token from `num_bytes` of OS randomness
pub fn generate_token(num_bytes: usize) -> String {
    let mut bytes = vec![0u8; num_bytes];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Issues and redeems refresh tokens over a [`RefreshTokenRepository`]
#[derive(Clone)]
pub struct RefreshTokenStore {
    repository: Arc<dyn RefreshTokenRepository>,
    ttl: Duration,
}

impl RefreshTokenStore {
    pub fn new(repository: Arc<dyn RefreshTokenRepository>, refresh_token_expiry_secs: i64) -> Self {
        Self {
            repository,
            ttl: Duration::seconds(refresh_token_expiry_secs),
        }
    }

    /// Generate and persist a token for `user_id`, expiring `ttl` after `now`
    pub async fn issue(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<RefreshTokenRecord> {
        self.repository
            .insert(NewRefreshToken {
                token: generate_token(REFRESH_TOKEN_BYTES),
                user_id,
                expires_at: now + self.ttl,
            })
            .await
    }

    /// Remove the token from the store and return it if it was present
    ///
    /// The token is gone afterwards whether or not it has expired; checking
    /// expiry is up to the caller.
    pub async fn consume(&self, token: &str) -> Result<Option<RefreshTokenRecord>> {
        self.repository.consume(token).await
    }

    pub fn repository(&self) -> &Arc<dyn RefreshTokenRepository> {
        &self.repository
    }

    #[inline]
    pub fn refresh_token_expiry_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }
}
