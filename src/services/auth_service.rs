use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::auth::Claims;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken,

    #[error("invalid claims")]
    InvalidClaims,

    #[error("JWT generation error: {0}")]
    Signing(String),
}

/// Issues and verifies HS256 bearer tokens. Stateless: nothing is stored and
/// nothing can be revoked.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn generate_token(&self, subject: &str) -> Result<String, AuthError> {
        self.sign(&Claims::new(subject))
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, then return the subject
    pub fn validate_token(&self, token: &str) -> Result<String, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        // Decode loosely so a bad `sub` is reported as a claims problem
        let data = decode::<Map<String, Value>>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;

        match data.claims.get("sub") {
            Some(Value::String(sub)) => Ok(sub.clone()),
            _ => Err(AuthError::InvalidClaims),
        }
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}
