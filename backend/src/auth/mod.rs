//! Authentication module
//!
//! JWT access tokens, rotating refresh tokens and password hashing,
//! plus the extractors that guard authenticated routes.

mod error;
mod jwt;
mod middleware;
mod password;
mod refresh_token;

pub use error::AuthError;
pub use jwt::{Claims, JwtKeys, JwtService};
pub use middleware::{bearer_token, AdminUser, CurrentUser};
pub use password::PasswordService;
pub use refresh_token::{generate_token, RefreshTokenStore, REFRESH_TOKEN_BYTES};
