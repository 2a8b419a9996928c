//! Token Issuance and Validation
//!
//! Stateless bearer tokens: HS256-signed claims with a fixed 24 h
//! lifetime. No server-side token state and no revocation list; logout is
//! client-side token discard.
//!
//! The three validation failure kinds exist for logging only. Callers must
//! surface all of them as the same opaque unauthorized response.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::application::config::AuthConfig;
use crate::domain::value_object::Email;

/// Claims embedded in an issued token
///
/// Immutable once issued; not stored server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id
    pub sub: String,
    /// The user's email at issuance time
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiry (Unix timestamp)
    pub exp: i64,
}

/// Token errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Token expired
    #[error("token expired")]
    Expired,

    /// Token structurally invalid (not a JWT, bad base64, wrong claim shape)
    #[error("token malformed")]
    Malformed,

    /// Signature check failed, or the token claims a different algorithm
    #[error("token signature invalid")]
    SignatureInvalid,

    /// Signing failed at issuance
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Token issuer/validator
///
/// Pure function of secret + claims + clock; no mutable state, safe to
/// share across tasks without synchronization.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs: token_ttl.as_secs() as i64,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl)
    }

    /// Issue a signed token for the given identity
    pub fn issue(&self, user_id: &UserId, email: &Email) -> Result<String, TokenError> {
        self.issue_at(user_id, email, Utc::now())
    }

    fn issue_at(
        &self,
        user_id: &UserId,
        email: &Email,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat,
            exp: iat + self.ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a token and return its claims
    ///
    /// Enforces the HS256 algorithm (alg-substitution tokens are rejected
    /// as signature failures), the signature, and expiry with zero leeway.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm
                | jsonwebtoken::errors::ErrorKind::InvalidAlgorithmName => {
                    TokenError::SignatureInvalid
                }
                _ => TokenError::Malformed,
            })
    }
}
