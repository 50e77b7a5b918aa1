//! Password hashing and verification
//!
//! New hashes use the configured scheme (bcrypt unless configured otherwise).
//! Verification identifies the scheme from the stored hash, so bcrypt and
//! Argon2 hashes can coexist in the `user` table.
//!
//! # Performance Considerations
//!
//! Both schemes are intentionally CPU-intensive. In async contexts use
//! `hash_async` / `verify_async`, which run on the blocking thread pool.

use crate::config::{PasswordConfig, PasswordScheme};
use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

const ARGON2_PREFIX: &str = "$argon2";

/// Password hashing service
#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    scheme: PasswordScheme,
    bcrypt_cost: u32,
}

impl PasswordService {
    pub fn new(scheme: PasswordScheme, bcrypt_cost: u32) -> Self {
        Self {
            scheme,
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &PasswordConfig) -> Self {
        Self::new(config.scheme, config.bcrypt_cost)
    }

    /// Hash a password with the configured scheme (blocking operation)
    pub fn hash(&self, password: &str) -> Result<String> {
        match self.scheme {
            PasswordScheme::Bcrypt => bcrypt::hash(password, self.bcrypt_cost)
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e)),
            PasswordScheme::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
                Ok(hash.to_string())
            }
        }
    }

    /// Hash a password asynchronously (non-blocking)
    ///
    /// Spawns the CPU-intensive work on a blocking thread pool,
    /// preventing it from blocking the async runtime.
    pub async fn hash_async(&self, password: String) -> Result<String> {
        let service = *self;
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// The comparison is done by the hashing library in constant time.
    /// A hash that cannot be parsed never matches.
    pub fn verify(password: &str, hash: &str) -> bool {
        if hash.starts_with(ARGON2_PREFIX) {
            match PasswordHash::new(hash) {
                Ok(parsed) => Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
                Err(_) => false,
            }
        } else {
            bcrypt::verify(password, hash).unwrap_or(false)
        }
    }

    /// Verify a password asynchronously (non-blocking)
    ///
    /// Only a failure to run the task is an error; a mismatch is `Ok(false)`.
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::from_config(&PasswordConfig::default())
    }
}
