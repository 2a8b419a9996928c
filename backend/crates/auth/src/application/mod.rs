//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod login;
pub mod register;
pub mod sso;
pub mod token;

// Re-exports
pub use config::AuthConfig;
pub use login::{AuthOutput, LoginInput, LoginUseCase};
pub use register::{RegisterInput, RegisterUseCase};
pub use sso::{GithubIdentity, GoogleTokenInfo, IdentityProvider, SsoInput, SsoUseCase};
pub use token::{Claims, TokenError, TokenService};
