//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the auth primitives.

pub mod auth;
pub mod seed;
pub mod user;

pub use auth::AuthService;
pub use seed::{ensure_admin, SeedOutcome};
pub use user::{CreateUser, UserService};
