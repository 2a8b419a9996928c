//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::Context;
use auth::{AuthConfig, PgIdentityRepository, auth_router};
use axum::{
    Json, Router, http,
    http::{Method, header},
    middleware,
    routing::get,
};
use platform::rate_limit::{RateLimitConfig, SlidingWindowLimiter, spawn_sweeper};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Where the rate limiter is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RateLimitScope {
    /// Authentication endpoints only (default)
    AuthOnly,
    /// Every route, health included
    Global,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,platform=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url =
        env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Token signing secret. There is no fallback: starting with a
    // known default secret would make every issued token forgeable.
    let jwt_secret = env::var("JWT_SECRET")
        .context("JWT_SECRET must be set; refusing to start without a signing secret")?;
    anyhow::ensure!(
        !jwt_secret.trim().is_empty(),
        "JWT_SECRET must not be empty"
    );

    let mut auth_config = AuthConfig::new(jwt_secret.into_bytes());

    match (
        env::var("GITHUB_CLIENT_ID").ok(),
        env::var("GITHUB_CLIENT_SECRET").ok(),
    ) {
        (Some(id), Some(secret)) => {
            auth_config = auth_config.with_github(id, secret);
            tracing::info!("GitHub OAuth configured");
        }
        (None, None) => {
            tracing::info!("GitHub OAuth not configured, callback endpoint will return an error");
        }
        _ => {
            tracing::warn!(
                "Only one of GITHUB_CLIENT_ID / GITHUB_CLIENT_SECRET is set, ignoring both"
            );
        }
    }

    // Rate limiter: explicit instance shared by handle, swept hourly
    let rate_limit_config = RateLimitConfig::new(
        env_parse("RATE_LIMIT_MAX_REQUESTS", 100),
        env_parse("RATE_LIMIT_WINDOW_SECS", 60),
    );
    let limiter = Arc::new(SlidingWindowLimiter::new(rate_limit_config));
    let _sweeper = spawn_sweeper(limiter.clone(), Duration::from_secs(3600));

    let rate_limit_scope = match env::var("RATE_LIMIT_SCOPE").as_deref() {
        Ok("global") => RateLimitScope::Global,
        Ok("auth") | Err(_) => RateLimitScope::AuthOnly,
        Ok(other) => {
            tracing::warn!(scope = other, "Unknown RATE_LIMIT_SCOPE, using auth-only");
            RateLimitScope::AuthOnly
        }
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]));

    // Build router
    let repo = PgIdentityRepository::new(pool.clone());
    let router_limiter =
        (rate_limit_scope == RateLimitScope::AuthOnly).then(|| limiter.clone());

    let mut app = Router::new()
        .route("/health", get(health))
        .merge(auth_router(repo, auth_config, router_limiter)?)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    if rate_limit_scope == RateLimitScope::Global {
        app = app.layer(middleware::from_fn_with_state(
            auth::middleware::RateLimitState { limiter },
            auth::middleware::rate_limit,
        ));
    }

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Read a numeric env var, falling back to a default
fn env_parse<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
