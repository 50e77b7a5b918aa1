//! Common test utilities for integration tests
//!
//! [`TestApp`] drives the full router (all middleware included) over
//! in-memory repositories and a [`ManualClock`], so expiry can be tested by
//! moving the clock instead of sleeping.

#![allow(dead_code)]

use auth_backend::{
    clock::ManualClock,
    config::AppConfig,
    routes,
    services::CreateUser,
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use fake::{faker::internet::en::SafeEmail, faker::name::en::Name, Fake};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "integration-password";

/// Captured response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|e| {
            panic!("response body is not JSON ({}): {}", e, self.body)
        })
    }

    /// `detail` field of an error body
    pub fn detail(&self) -> String {
        self.json()["detail"].as_str().unwrap_or_default().to_string()
    }
}

/// User created through the service layer
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub clock: ManualClock,
}

impl TestApp {
    /// Create a new test application over in-memory storage
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let clock = ManualClock::default();
        let state = AppState::in_memory(config, Arc::new(clock.clone()))
            .expect("Failed to build test state");
        let app = routes::create_router(state.clone());

        Self { app, state, clock }
    }

    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.request(request).await
    }

    /// Make a GET request with a bearer token
    pub async fn get_auth(&self, path: &str, token: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        self.request(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Make a POST request with a urlencoded form body
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form_body(fields)))
            .unwrap();
        self.request(request).await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post_form(
            "/api/v1/auth/login/access-token",
            &[("username", email), ("password", password)],
        )
        .await
    }

    pub async fn refresh(&self, refresh_token: &str) -> TestResponse {
        self.post_json(
            "/api/v1/auth/login/refresh-token",
            &serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await
    }

    /// Create a user with a generated email and name
    pub async fn create_test_user(&self, is_admin: bool) -> TestUser {
        let email = format!(
            "{}.{}",
            Uuid::new_v4().simple(),
            SafeEmail().fake::<String>()
        );
        let full_name: String = Name().fake();

        let user = self
            .state
            .users()
            .create_user(CreateUser {
                email: email.clone(),
                password: TEST_PASSWORD.to_string(),
                is_admin,
                full_name: Some(full_name.clone()),
            })
            .await
            .expect("Failed to create test user");

        TestUser {
            id: user.id,
            email,
            password: TEST_PASSWORD.to_string(),
            full_name: Some(full_name),
        }
    }

    /// Create a user and log in, returning the user and the token body
    pub async fn logged_in_user(&self, is_admin: bool) -> (TestUser, Value) {
        let user = self.create_test_user(is_admin).await;
        let response = self.login(&user.email, &user.password).await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        (user, response.json())
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.password.bcrypt_cost = 4;
    config
}

/// Encode `application/x-www-form-urlencoded` pairs
pub fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", form_encode(key), form_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn form_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'*' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}
