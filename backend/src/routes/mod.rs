//! Route definitions for the auth API
//!
//! This module organizes all API routes and applies middleware.

use crate::config::CorsConfig;
use crate::error::panic_response;
use crate::state::AppState;
use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{warn, Span};

mod auth;
mod health;
mod users;


pub use auth::auth_routes;
pub use users::user_routes;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let config = state.config();
    let timeout = Duration::from_secs(config.server.request_timeout_secs);
    let cors = cors_layer(&config.cors);

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest(&config.server.api_prefix, api_routes())
        // Apply middleware layers
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout));

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

/// API routes mounted under the configured prefix
fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::auth_routes())
        .merge(users::user_routes())
}

/// CORS for the configured origins; `None` when the list is empty
///
/// Credentials are allowed, so origins, methods and headers are listed
/// explicitly. Origins that are not valid header values are skipped.
fn cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = config
        .origins
        .iter()
        .filter_map(|origin| {
            let trimmed = origin.trim().trim_end_matches('/');
            HeaderValue::from_str(trimmed)
                .map_err(|_| warn!(origin = %origin, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]),
    )
}

/// Request span carrying the id assigned by `SetRequestIdLayer`
fn request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

async fn root() -> Json<Value> {
    Json(json!({ "Hello": "World" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_disabled_without_origins() {
        let config = CorsConfig { origins: vec![] };
        assert!(cors_layer(&config).is_none());
    }

    #[test]
    fn test_cors_skips_invalid_origins() {
        let config = CorsConfig {
            origins: vec!["bad\norigin".to_string()],
        };
        assert!(cors_layer(&config).is_none());

        let config = CorsConfig {
            origins: vec!["http://localhost:5173/".to_string(), "bad\norigin".to_string()],
        };
        assert!(cors_layer(&config).is_some());
    }
}
