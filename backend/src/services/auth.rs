//! Authentication service: login, refresh-token rotation and bearer checks
//!
//! Every successful login or refresh mints a brand-new access token and a
//! brand-new refresh token. A refresh token is deleted the moment it is
//! presented, before its expiry is looked at, so an expired token is burned
//! by the attempt that discovers it and a token can be redeemed at most once.
//!
//! There is no token-family tracking: a replayed refresh token only makes the
//! next redemption fail with the generic error.

use crate::auth::{AuthError, JwtService, PasswordService, RefreshTokenStore};
use crate::repositories::{UserRecord, UserRepository};
use auth_shared::Token;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Orchestrates the credential store, access token codec and refresh store
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    refresh_tokens: RefreshTokenStore,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        refresh_tokens: RefreshTokenStore,
        jwt: JwtService,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            jwt,
        }
    }

    /// Login with email and password
    ///
    /// Unknown email and wrong password fail identically.
    ///
    /// # Performance
    /// Password verification is offloaded to blocking thread pool.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<Token, AuthError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            warn!(email = %email, "Login failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let valid =
            PasswordService::verify_async(password.to_string(), user.hashed_password.clone())
                .await?;
        if !valid {
            warn!(email = %email, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_tokens(user.id, now).await?;
        info!(user_id = %user.id, "User logged in");
        Ok(token)
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh(&self, refresh_token: &str, now: DateTime<Utc>) -> Result<Token, AuthError> {
        let Some(record) = self.refresh_tokens.consume(refresh_token).await? else {
            warn!("Refresh failed: unknown refresh token");
            return Err(AuthError::InvalidOrExpiredRefreshToken);
        };

        if record.is_expired(now) {
            warn!(user_id = %record.user_id, "Refresh failed: expired refresh token");
            return Err(AuthError::InvalidOrExpiredRefreshToken);
        }

        let token = self.issue_tokens(record.user_id, now).await?;
        info!(user_id = %record.user_id, "Refresh token rotated");
        Ok(token)
    }

    /// Resolve a bearer access token to its user
    pub async fn authenticate(&self, bearer: &str, now: DateTime<Utc>) -> Result<UserRecord, AuthError> {
        let user_id = self.jwt.verify(bearer, now)?;

        self.users.find_by_id(user_id).await?.ok_or_else(|| {
            warn!(user_id = %user_id, "Access token for unknown user");
            AuthError::InvalidCredentials
        })
    }

    /// Admin-only gate
    pub fn require_admin(&self, user: UserRecord) -> Result<UserRecord, AuthError> {
        if user.is_admin {
            Ok(user)
        } else {
            warn!(user_id = %user.id, "Forbidden: admin privileges required");
            Err(AuthError::Forbidden)
        }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    pub fn refresh_tokens(&self) -> &RefreshTokenStore {
        &self.refresh_tokens
    }

    async fn issue_tokens(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Token, AuthError> {
        let access_token = self.jwt.issue(user_id, now)?;
        let refresh_token = self.refresh_tokens.issue(user_id, now).await?;
        Ok(Token::bearer(access_token, refresh_token.token))
    }
}
