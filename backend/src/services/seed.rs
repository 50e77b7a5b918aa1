//! Startup seeding of the initial admin account

use crate::config::AdminConfig;
use crate::services::user::{CreateUser, UserService};
use anyhow::Result;
use secrecy::ExposeSecret;
use tracing::{info, warn};
use uuid::Uuid;

/// What [`ensure_admin`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(Uuid),
    AlreadyExists,
    /// No admin email/password configured
    Skipped,
}

/// Create the configured admin user unless a user with that email exists
pub async fn ensure_admin(users: &UserService, admin: &AdminConfig) -> Result<SeedOutcome> {
    let (Some(email), Some(password)) = (admin.email.as_deref(), admin.password.as_ref()) else {
        warn!("Admin email or password not configured; skipping admin seed");
        return Ok(SeedOutcome::Skipped);
    };

    if users.find_by_email(email).await?.is_some() {
        info!(email = %email, "Admin user already exists");
        return Ok(SeedOutcome::AlreadyExists);
    }

    let user = users
        .create_user(CreateUser {
            email: email.to_string(),
            password: password.expose_secret().clone(),
            is_admin: true,
            full_name: Some(admin.full_name.clone()),
        })
        .await?;

    info!(user_id = %user.id, email = %email, "Admin user created");
    Ok(SeedOutcome::Created(user.id))
}
