//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, token service, configuration
//! - `infra/` - PostgreSQL/in-memory repositories, identity provider client
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Email + password login and registration
//! - Stateless HS256 bearer tokens (24 h lifetime, no revocation list)
//! - SSO via Google ID-token introspection and GitHub OAuth code exchange
//! - Mandatory and optional auth middleware for downstream resources
//! - Per-IP sliding-window rate limiting on the auth endpoints
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, per-hash random salt
//! - Every authentication failure surfaces the same opaque 401
//! - Tokens validated against exactly one MAC algorithm (HS256)
//! - SSO-only accounts carry no password hash and cannot password-login

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::token::TokenService;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgIdentityRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::memory::InMemoryIdentityRepository;
    pub use crate::infra::postgres::PgIdentityRepository as IdentityStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
