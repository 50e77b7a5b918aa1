//! User routes

use crate::auth::{AdminUser, CurrentUser};
use crate::error::ApiResult;
use crate::state::AppState;
use auth_shared::{ListParams, UserPublic, UsersPublic};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/", get(list_users))
        .route("/users/me", get(read_user_me))
}

/// Get the current user
///
/// GET /api/v1/users/me
///
/// # Authentication
/// Requires valid Bearer token in Authorization header.
async fn read_user_me(CurrentUser(user): CurrentUser) -> Json<UserPublic> {
    Json(user.into())
}

/// List users (admin only)
///
/// GET /api/v1/users/?skip=0&limit=100
async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<UsersPublic>> {
    Ok(Json(state.users().list_users(params).await?))
}
