//! SSO Use Case (External Identity Bridge)
//!
//! Validates third-party identity assertions and maps them to local
//! accounts, creating one on first sight. Two entry points:
//!
//! - `execute`: the `POST /auth/sso` body. Google assertions are
//!   introspected against the provider; the GitHub variant of this
//!   endpoint carries the profile directly (the verified GitHub flow is
//!   the OAuth callback).
//! - `github_callback`: the OAuth code exchange round trip.
//!
//! Provider calls never run while any lock is held and are never retried.

use std::sync::Arc;

use kernel::id::DepartmentId;
use serde::Deserialize;
use uuid::Uuid;

use crate::application::login::AuthOutput;
use crate::application::token::TokenService;
use crate::domain::entity::user::User;
use crate::domain::repository::{DepartmentRepository, UserRepository};
use crate::domain::value_object::{Email, UserName};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Provider port
// ============================================================================

/// Assertion returned by Google's tokeninfo endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokenInfo {
    pub email: String,
    /// Google reports this as the string "true"/"false"
    #[serde(default)]
    pub email_verified: String,
    #[serde(default)]
    pub name: String,
}

/// Profile assembled from the GitHub code exchange
#[derive(Debug, Clone)]
pub struct GithubIdentity {
    /// Provider-assigned handle, used as the name fallback
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Outbound port to the third-party identity providers
#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Introspect a Google-issued ID token
    async fn verify_google_id_token(&self, id_token: &str) -> AuthResult<GoogleTokenInfo>;

    /// Exchange a GitHub OAuth code and fetch the user's profile
    async fn fetch_github_identity(&self, code: &str) -> AuthResult<GithubIdentity>;
}

// ============================================================================
// Use case
// ============================================================================

/// SSO input (`POST /auth/sso`)
pub struct SsoInput {
    /// "google" or "github"
    pub provider: String,
    pub id_token: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub department_id: Option<Uuid>,
}

/// SSO use case
pub struct SsoUseCase<U, D, P>
where
    U: UserRepository,
    D: DepartmentRepository,
    P: IdentityProvider,
{
    users: Arc<U>,
    departments: Arc<D>,
    provider: Arc<P>,
    tokens: Arc<TokenService>,
}

impl<U, D, P> SsoUseCase<U, D, P>
where
    U: UserRepository,
    D: DepartmentRepository,
    P: IdentityProvider,
{
    pub fn new(
        users: Arc<U>,
        departments: Arc<D>,
        provider: Arc<P>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            departments,
            provider,
            tokens,
        }
    }

    /// Handle a `POST /auth/sso` assertion
    pub async fn execute(&self, input: SsoInput) -> AuthResult<AuthOutput> {
        let (email, name) = match input.provider.as_str() {
            "google" => {
                let id_token = input
                    .id_token
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| {
                        AuthError::Validation(
                            "idToken is required for the google provider".to_string(),
                        )
                    })?;

                let info = self.provider.verify_google_id_token(id_token).await?;

                // An unverified email is rejected no matter what else the
                // assertion carries.
                if info.email_verified != "true" {
                    return Err(AuthError::ExternalVerificationFailed(
                        "email not verified".to_string(),
                    ));
                }

                let name = if info.name.is_empty() {
                    input.name
                } else {
                    Some(info.name)
                };
                (info.email, name)
            }
            "github" => {
                let email = input
                    .email
                    .filter(|e| !e.is_empty())
                    .ok_or_else(|| {
                        AuthError::Validation(
                            "email is required for the github provider".to_string(),
                        )
                    })?;
                (email, input.name)
            }
            other => {
                return Err(AuthError::Validation(format!(
                    "Unsupported provider: {other}"
                )));
            }
        };

        let user = self
            .resolve_identity(&email, name.as_deref(), input.department_id, &input.provider)
            .await?;
        self.issue_for(user).await
    }

    /// Handle the `GET /auth/github/callback` code exchange
    pub async fn github_callback(&self, code: &str) -> AuthResult<AuthOutput> {
        if code.is_empty() {
            return Err(AuthError::Validation(
                "No authorization code provided".to_string(),
            ));
        }

        let identity = self.provider.fetch_github_identity(code).await?;

        let email = identity
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                AuthError::Validation("GitHub account has no usable email".to_string())
            })?;

        let name = identity
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or(identity.login);

        let user = self
            .resolve_identity(&email, Some(&name), None, "github")
            .await?;
        self.issue_for(user).await
    }

    /// Look the verified email up, creating a local identity on first sight
    async fn resolve_identity(
        &self,
        email: &str,
        name: Option<&str>,
        department_id: Option<Uuid>,
        provider: &str,
    ) -> AuthResult<User> {
        let email = Email::new(email)?;

        if let Some(user) = self.users.find_by_email(&email).await? {
            return Ok(user);
        }

        // Provider-supplied names are taken as-is; the directory name
        // rules only bind self-service registration.
        let name = name.unwrap_or_default().trim().to_string();
        if name.is_empty() {
            return Err(AuthError::Validation("Name is required".to_string()));
        }
        let name = UserName::from_db(name);

        let department_id = match department_id {
            Some(id) => {
                let id = DepartmentId::from_uuid(id);
                self.departments
                    .find_department(&id)
                    .await?
                    .ok_or_else(|| AuthError::Validation("Unknown department".to_string()))?
                    .id
            }
            None => {
                self.departments
                    .default_department()
                    .await?
                    .ok_or(AuthError::NoDefaultDepartment)?
                    .id
            }
        };

        // SSO accounts carry no password hash.
        let user = User::new(name, email, None, department_id);
        self.users.create(&user).await?;

        tracing::info!(user_id = %user.id, provider, "Created user from SSO sign-in");

        Ok(user)
    }

    async fn issue_for(&self, user: User) -> AuthResult<AuthOutput> {
        let token = self.tokens.issue(&user.id, &user.email)?;
        let department = self.departments.find_department(&user.department_id).await?;

        tracing::info!(user_id = %user.id, "User signed in via SSO");

        Ok(AuthOutput {
            token,
            user,
            department,
        })
    }
}
