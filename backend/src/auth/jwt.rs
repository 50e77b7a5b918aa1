//! Access token issuance and verification
//!
//! Access tokens are stateless JWTs signed with a shared HMAC secret. They
//! carry only the user id (`sub`) and an absolute expiry (`exp`); nothing is
//! stored server side, so there is no revocation list. A leaked token stays
//! valid until it expires, which is why the default lifetime is 5 minutes.
//!
//! Expiry is checked against the caller's `now` rather than the wall clock,
//! so keys are pre-computed once and time is injected per call.

use crate::auth::AuthError;
use crate::config::JwtConfig;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Pre-computed JWT keys for efficient token operations
/// These are expensive to create, so we cache them in AppState
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    /// This should be called once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Access token codec
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    algorithm: Algorithm,
    access_token_ttl: Duration,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    ///
    /// # Performance Note
    /// Call this once at application startup and store in AppState.
    /// Do NOT create per-request.
    pub fn new(secret: &str, algorithm: Algorithm, access_token_expiry_secs: i64) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            algorithm,
            access_token_ttl: Duration::seconds(access_token_expiry_secs),
        }
    }

    /// Build from configuration, rejecting non-HMAC algorithms
    pub fn from_config(config: &JwtConfig) -> Result<Self> {
        Ok(Self::new(
            config.secret.expose_secret(),
            config.algorithm()?,
            config.access_token_expiry_secs,
        ))
    }

    /// Issue an access token for a user, expiring `access_token_ttl` after `now`
    pub fn issue(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.access_token_ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to generate access token: {}", e))
    }

    /// Verify an access token and return its subject
    ///
    /// Every failure maps to [`AuthError::InvalidCredentials`]; the concrete
    /// reason is only logged.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
        let claims = self.decode(token).map_err(|e| {
            debug!(error = %e, "Access token rejected");
            AuthError::InvalidCredentials
        })?;

        if claims.exp <= now.timestamp() {
            debug!(sub = %claims.sub, "Access token expired");
            return Err(AuthError::InvalidCredentials);
        }

        Uuid::parse_str(&claims.sub).map_err(|_| {
            debug!("Access token subject is not a user id");
            AuthError::InvalidCredentials
        })
    }

    /// Check signature, algorithm and claim shape; expiry is left to `verify`
    fn decode(&self, token: &str) -> jsonwebtoken::errors::Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, self.keys.decoding(), &validation).map(|data| data.claims)
    }

    /// Get access token expiry in seconds
    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_ttl.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret", Algorithm::HS256, 300)
    }

    #[test]
    fn test_issue_and_verify() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let token = service.issue(user_id, now).unwrap();
        assert_eq!(service.verify(&token, now).unwrap(), user_id);
    }

    #[test]
    fn test_expiry_is_issue_time_plus_ttl() {
        let service = create_test_service();
        let now = Utc::now();
        let token = service.issue(Uuid::new_v4(), now).unwrap();

        let claims = service.decode(&token).unwrap();
        assert_eq!(claims.exp, (now + Duration::seconds(300)).timestamp());
        assert_eq!(claims.iat, now.timestamp());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();
        let now = Utc::now();
        let token = service.issue(Uuid::new_v4(), now).unwrap();

        assert!(service.verify(&token, now + Duration::seconds(299)).is_ok());
        assert!(matches!(
            service.verify(&token, now + Duration::seconds(300)),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_zero_ttl_token_is_immediately_expired() {
        let service = JwtService::new("test-secret", Algorithm::HS256, 0);
        let now = Utc::now();
        let token = service.issue(Uuid::new_v4(), now).unwrap();

        assert!(matches!(
            service.verify(&token, now),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = create_test_service();
        let other = JwtService::new("another-secret", Algorithm::HS256, 300);
        let now = Utc::now();
        let token = other.issue(Uuid::new_v4(), now).unwrap();

        assert!(matches!(
            service.verify(&token, now),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let service = create_test_service();
        let hs512 = JwtService::new("test-secret", Algorithm::HS512, 300);
        let now = Utc::now();
        let token = hs512.issue(Uuid::new_v4(), now).unwrap();

        assert!(service.verify(&token, now).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = create_test_service();
        let now = Utc::now();
        let token = service.issue(Uuid::new_v4(), now).unwrap();

        let forged = service.issue(Uuid::new_v4(), now).unwrap();
        let forged_payload = forged.split('.').nth(1).unwrap().to_string();
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = &forged_payload;
        let tampered = parts.join(".");

        assert!(service.verify(&tampered, now).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let service = create_test_service();
        for token in ["", "invalid_token", "invalid.token.here", "a.b"] {
            assert!(matches!(
                service.verify(token, Utc::now()),
                Err(AuthError::InvalidCredentials)
            ));
        }
    }

    #[test]
    fn test_missing_subject_rejected() {
        #[derive(Serialize)]
        struct NoSubject {
            exp: i64,
        }

        let service = create_test_service();
        let now = Utc::now();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoSubject {
                exp: now.timestamp() + 300,
            },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(service.verify(&token, now).is_err());
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let service = create_test_service();
        let now = Utc::now();
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            exp: now.timestamp() + 300,
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(
            service.verify(&token, now),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_service_is_clone_cheap() {
        let service = create_test_service();
        let _cloned = service.clone(); // Should be cheap due to Arc
    }
}
