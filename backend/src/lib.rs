//! Auth Backend Library
//!
//! Password login, JWT access tokens and rotating refresh tokens behind an
//! axum router. Exposes the backend modules for use in tests and other crates.

pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
