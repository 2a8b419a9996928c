//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Every authentication-path failure (bad credentials, bad token, failed
//! external verification) collapses to the same opaque 401 message before
//! crossing the trust boundary; only logs retain the specific cause.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::application::token::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// The uniform message for every authentication failure
const AUTH_FAILED: &str = "Invalid credentials";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed request input (bad email format, weak password, ...)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown email, wrong password, or password login on an SSO-only account
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Authorization header missing or not a Bearer scheme
    #[error("Missing or malformed authorization header")]
    MissingAuthorization,

    /// Bearer token rejected (expired, malformed, bad signature)
    #[error("Token rejected: {0}")]
    InvalidToken(TokenError),

    /// Identity provider refused the assertion (or email unverified)
    #[error("External verification failed: {0}")]
    ExternalVerificationFailed(String),

    /// Email already registered
    #[error("A user with this email already exists")]
    EmailTaken,

    /// Too many requests from one client key
    #[error("Rate limit exceeded")]
    RateLimited { retry_after_secs: u64 },

    /// No department given and none exists to default to
    #[error("No default department available")]
    NoDefaultDepartment,

    /// GitHub OAuth requested but client id/secret not configured
    #[error("GitHub OAuth not configured")]
    OAuthNotConfigured,

    /// Identity provider unreachable or returned an unexpected shape
    #[error("Upstream identity provider error: {0}")]
    Upstream(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::MissingAuthorization
            | AuthError::InvalidToken(_)
            | AuthError::ExternalVerificationFailed(_) => StatusCode::UNAUTHORIZED,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AuthError::NoDefaultDepartment
            | AuthError::OAuthNotConfigured
            | AuthError::Upstream(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials
            | AuthError::MissingAuthorization
            | AuthError::InvalidToken(_)
            | AuthError::ExternalVerificationFailed(_) => ErrorKind::Unauthorized,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::RateLimited { .. } => ErrorKind::TooManyRequests,
            AuthError::NoDefaultDepartment
            | AuthError::OAuthNotConfigured
            | AuthError::Upstream(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError with the externally visible message
    ///
    /// Authentication failures are normalized to one opaque message;
    /// upstream and database causes are not exposed at all.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Validation(msg) => AppError::bad_request(msg.clone()),
            AuthError::InvalidCredentials
            | AuthError::MissingAuthorization
            | AuthError::InvalidToken(_)
            | AuthError::ExternalVerificationFailed(_) => AppError::unauthorized(AUTH_FAILED),
            AuthError::EmailTaken => AppError::conflict(self.to_string()),
            AuthError::RateLimited { .. } => {
                AppError::too_many_requests("Rate limit exceeded. Please try again later.")
            }
            AuthError::NoDefaultDepartment => AppError::internal("No default department available"),
            AuthError::OAuthNotConfigured => AppError::internal("GitHub OAuth not configured"),
            AuthError::Upstream(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("Internal error")
            }
        }
    }

    /// Log the error with appropriate level, keeping the specific cause
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Upstream(msg) => {
                tracing::error!(cause = %msg, "Identity provider error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::NoDefaultDepartment | AuthError::OAuthNotConfigured => {
                tracing::error!(error = %self, "Auth configuration problem");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidToken(cause) => {
                tracing::warn!(cause = %cause, "Token rejected");
            }
            AuthError::ExternalVerificationFailed(cause) => {
                tracing::warn!(cause = %cause, "External assertion rejected");
            }
            AuthError::RateLimited { retry_after_secs } => {
                tracing::warn!(retry_after_secs, "Rate limit exceeded");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => AuthError::Internal(msg),
            other => AuthError::InvalidToken(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_share_one_message() {
        let credential_err = AuthError::InvalidCredentials.to_app_error();
        let token_err = AuthError::InvalidToken(TokenError::Expired).to_app_error();
        let header_err = AuthError::MissingAuthorization.to_app_error();
        let sso_err =
            AuthError::ExternalVerificationFailed("email not verified".into()).to_app_error();

        for err in [&credential_err, &token_err, &header_err, &sso_err] {
            assert_eq!(err.status_code(), 401);
            assert_eq!(err.message(), AUTH_FAILED);
        }
    }

    #[test]
    fn test_upstream_cause_not_exposed() {
        let err = AuthError::Upstream("github returned 502".into()).to_app_error();
        assert_eq!(err.status_code(), 500);
        assert!(!err.message().contains("github"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AuthError::Validation("bad email".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::RateLimited {
                retry_after_secs: 20
            }
            .status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AuthError::NoDefaultDepartment.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
