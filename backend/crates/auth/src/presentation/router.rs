//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use platform::rate_limit::SlidingWindowLimiter;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::sso::IdentityProvider;
use crate::application::token::TokenService;
use crate::domain::repository::{DepartmentRepository, UserRepository};
use crate::error::AuthResult;
use crate::infra::postgres::PgIdentityRepository;
use crate::infra::provider::HttpIdentityProvider;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{
    AuthGateState, RateLimitState, optional_auth, rate_limit, require_auth,
};

/// Create the auth router with the PostgreSQL repository
///
/// `limiter`, when given, is applied to the authentication endpoints only;
/// passing `None` leaves rate limiting to an outer layer (or disables it).
pub fn auth_router(
    repo: PgIdentityRepository,
    config: AuthConfig,
    limiter: Option<Arc<SlidingWindowLimiter>>,
) -> AuthResult<Router> {
    let provider = HttpIdentityProvider::new(&config)?;
    Ok(auth_router_generic(repo, provider, config, limiter))
}

/// Create a generic auth router for any repository/provider implementation
pub fn auth_router_generic<R, P>(
    repo: R,
    provider: P,
    config: AuthConfig,
    limiter: Option<Arc<SlidingWindowLimiter>>,
) -> Router
where
    R: UserRepository + DepartmentRepository + Clone + Send + Sync + 'static,
    P: IdentityProvider + Clone + Send + Sync + 'static,
{
    let tokens = Arc::new(TokenService::from_config(&config));
    let state = AuthAppState {
        repo: Arc::new(repo),
        provider: Arc::new(provider),
        tokens: tokens.clone(),
    };

    let mut auth_routes = Router::new()
        .route("/auth/login", post(handlers::login::<R, P>))
        .route("/auth/register", post(handlers::register::<R, P>))
        .route("/auth/sso", post(handlers::sso_login::<R, P>))
        .route(
            "/auth/github/callback",
            get(handlers::github_callback::<R, P>),
        );

    if let Some(limiter) = limiter {
        auth_routes = auth_routes.route_layer(middleware::from_fn_with_state(
            RateLimitState { limiter },
            rate_limit,
        ));
    }

    let protected = Router::new()
        .route("/users/me", get(handlers::me::<R, P>))
        .route_layer(middleware::from_fn_with_state(
            AuthGateState {
                tokens: tokens.clone(),
            },
            require_auth,
        ));

    // Public, but aware of the caller's identity when a token is present.
    let mixed = Router::new()
        .route("/departments", get(handlers::list_departments::<R, P>))
        .route_layer(middleware::from_fn_with_state(
            AuthGateState { tokens },
            optional_auth,
        ));

    Router::new()
        .merge(auth_routes)
        .merge(protected)
        .merge(mixed)
        .with_state(state)
}
