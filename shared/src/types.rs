//! API request and response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token type marker returned with every token pair
pub const TOKEN_TYPE_BEARER: &str = "bearer";

/// Access/refresh token pair returned by login and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl Token {
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        }
    }
}

/// Password login form (`application/x-www-form-urlencoded`)
///
/// The email is sent in the `username` field, following the OAuth2
/// password grant form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Refresh request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Public view of a user; never carries password material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
    pub full_name: Option<String>,
}

/// Page of users
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersPublic {
    pub data: Vec<UserPublic>,
    pub count: i64,
}

/// Offset pagination parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub skip: i64,
    pub limit: i64,
}

impl ListParams {
    pub const MAX_LIMIT: i64 = 1000;
}

impl Default for ListParams {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

/// API error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
