//! Authentication routes
//!
//! Provides endpoints for password login and refresh-token rotation.
//!
//! # Performance Optimizations
//!
//! - Uses pre-computed JWT keys from AppState (no per-request allocation)
//! - Password verification runs on blocking thread pool (doesn't block async runtime)

use crate::error::ApiResult;
use crate::state::AppState;
use auth_shared::{LoginForm, RefreshTokenRequest, Token};
use axum::{extract::State, routing::post, Form, Json, Router};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login/access-token", post(login_access_token))
        .route("/auth/login/refresh-token", post(refresh_token))
}

/// Login with email and password
///
/// POST /api/v1/auth/login/access-token
///
/// Form body: `username` (the email) and `password`.
async fn login_access_token(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<Token>> {
    let token = state
        .auth()
        .login(&form.username, &form.password, state.now())
        .await?;
    Ok(Json(token))
}

/// Exchange a refresh token for a new token pair
///
/// POST /api/v1/auth/login/refresh-token
async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<Json<Token>> {
    let token = state.auth().refresh(&req.refresh_token, state.now()).await?;
    Ok(Json(token))
}
