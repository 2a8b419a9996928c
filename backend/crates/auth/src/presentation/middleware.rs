//! Auth and Rate Limit Middleware
//!
//! The auth gate comes in two variants: `require_auth` rejects requests
//! without a valid bearer token, `optional_auth` lets them through
//! anonymously. Both attach [`CurrentUser`] to the request extensions on
//! success, and neither tells the client why a token was rejected.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::id::UserId;
use platform::client::client_key;
use platform::rate_limit::SlidingWindowLimiter;
use std::sync::Arc;

use crate::application::token::{TokenError, TokenService};
use crate::error::AuthError;

/// Verified identity attached to the request by the auth gate
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub email: String,
}

/// Auth gate state
#[derive(Clone)]
pub struct AuthGateState {
    pub tokens: Arc<TokenService>,
}

/// Rate limit middleware state
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<SlidingWindowLimiter>,
}

/// Middleware that requires a valid bearer token
///
/// Missing header or wrong scheme rejects before any token parsing; every
/// validation failure maps to the same opaque 401.
pub async fn require_auth(
    State(state): State<AuthGateState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = match extract_bearer(&req) {
        Some(token) => token,
        None => return Err(AuthError::MissingAuthorization.into_response()),
    };

    let claims = state
        .tokens
        .validate(&token)
        .map_err(|e| AuthError::from(e).into_response())?;

    let user_id = UserId::parse(&claims.sub)
        .map_err(|_| AuthError::InvalidToken(TokenError::Malformed).into_response())?;

    req.extensions_mut().insert(CurrentUser {
        user_id,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

/// Middleware that accepts a bearer token but doesn't require one
///
/// Missing or invalid tokens silently downgrade the request to anonymous.
pub async fn optional_auth(
    State(state): State<AuthGateState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = extract_bearer(&req) {
        if let Ok(claims) = state.tokens.validate(&token) {
            if let Ok(user_id) = UserId::parse(&claims.sub) {
                req.extensions_mut().insert(CurrentUser {
                    user_id,
                    email: claims.email,
                });
            }
        }
    }

    next.run(req).await
}

/// Middleware that enforces the per-client rate limit
///
/// Rejections carry a `Retry-After` header with the seconds until the
/// oldest counted request leaves the window.
pub async fn rate_limit(
    State(state): State<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let client_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());

    let key = client_key(req.headers(), client_ip);
    let decision = state.limiter.check(&key);

    if !decision.allowed {
        let retry_after_secs = decision
            .retry_after
            .map(|d| d.as_secs_f64().ceil() as u64)
            .unwrap_or(1)
            .max(1);

        let mut response = AuthError::RateLimited { retry_after_secs }.into_response();
        if let Ok(value) = retry_after_secs.to_string().parse() {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        return Err(response);
    }

    Ok(next.run(req).await)
}

/// Extract the token from a `Bearer` authorization header
fn extract_bearer(req: &Request<Body>) -> Option<String> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;

    let token = header_value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}
