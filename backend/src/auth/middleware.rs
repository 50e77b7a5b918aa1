//! Authentication extractors
//!
//! [`CurrentUser`] resolves the `Authorization: Bearer <token>` header to a
//! stored user; [`AdminUser`] additionally requires the admin flag.
//!
//! # Performance
//!
//! Uses the pre-computed JWT keys held by `AuthService` in AppState, so no
//! key derivation happens per request.

use crate::error::ApiError;
use crate::repositories::UserRecord;
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::AuthError;

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// The scheme is matched case-insensitively. Returns `None` when the header
/// is missing, not valid ASCII, uses another scheme, or carries no token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Authenticated user resolved from the bearer access token
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = bearer_token(&parts.headers).ok_or(AuthError::InvalidCredentials)?;
        let user = app_state.auth().authenticate(token, app_state.now()).await?;

        Ok(CurrentUser(user))
    }
}

/// Authenticated user holding the admin flag
#[derive(Debug, Clone)]
pub struct AdminUser(pub UserRecord);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        Ok(AdminUser(app_state.auth().require_admin(user)?))
    }
}
