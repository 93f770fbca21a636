//! Bearer-token authentication.
//!
//! Verification only: tokens are minted by an external identity service.
//! The `sub` claim carries the student id used to scope log and declaration
//! operations.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handler::AppState;

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Student id of the authenticated caller.
    pub sub: u64,
    /// Caller role; informational at this layer, no scoping is applied.
    pub role: String,
    /// Expiry, seconds since the epoch.
    pub exp: u64,
}

/// Validates HS256 bearer tokens against a shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| ApiError::auth("Invalid token"))
    }
}

/// The authenticated student, extracted from the Authorization header.
#[derive(Debug, Clone)]
pub struct AuthStudent {
    pub student_id: u64,
    pub role: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthStudent
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::auth("Missing or invalid token"))?;
        let claims = state.verifier.verify(token)?;
        Ok(AuthStudent {
            student_id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(exp_offset_secs: i64) -> Claims {
        Claims {
            sub: 42,
            role: "student".to_string(),
            exp: (chrono::Utc::now().timestamp() + exp_offset_secs) as u64,
        }
    }

    #[test]
    fn test_valid_token_verifies() {
        let verifier = TokenVerifier::new("secret");
        let claims = verifier.verify(&token("secret", &claims(3600))).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "student");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let verifier = TokenVerifier::new("secret");
        let result = verifier.verify(&token("other-secret", &claims(3600)));
        assert!(matches!(result, Err(ApiError::Auth(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = TokenVerifier::new("secret");
        let result = verifier.verify(&token("secret", &claims(-3600)));
        assert!(matches!(result, Err(ApiError::Auth(_))));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let verifier = TokenVerifier::new("secret");
        assert!(verifier.verify("not-a-token").is_err());
    }
}
