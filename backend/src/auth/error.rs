//! Error kinds of the authentication core

use thiserror::Error;

/// Failures surfaced by login, refresh and the bearer check
///
/// Unknown email and wrong password share `InvalidCredentials`, as do every
/// access token failure (bad signature, malformed, expired, unknown user).
/// Unknown and expired refresh tokens share `InvalidOrExpiredRefreshToken`.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired refresh token")]
    InvalidOrExpiredRefreshToken,

    #[error("Unauthorized access")]
    Forbidden,

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}
