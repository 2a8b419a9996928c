//! Identity Provider HTTP Client
//!
//! Outbound calls to Google and GitHub. Every request carries a 10 second
//! timeout and runs without holding any shared lock. Failures are never
//! retried here; a failed provider call surfaces as a rejection.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::application::sso::{GithubIdentity, GoogleTokenInfo, IdentityProvider};
use crate::error::{AuthError, AuthResult};

const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_USER_URL: &str = "https://api.github.com/user";
const GITHUB_EMAILS_URL: &str = "https://api.github.com/user/emails";

/// Provider call timeout
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the third-party identity providers
#[derive(Clone)]
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    github_client_id: Option<String>,
    github_client_secret: Option<String>,
}

impl HttpIdentityProvider {
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            // GitHub's API rejects requests without a User-Agent.
            .user_agent("office-backend")
            .build()
            .map_err(|e| AuthError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            github_client_id: config.github_client_id.clone(),
            github_client_secret: config.github_client_secret.clone(),
        })
    }

    /// Fetch the primary email from the emails endpoint
    ///
    /// The profile fetch already succeeded at this point, so a failure
    /// here degrades gracefully instead of aborting the sign-in.
    async fn fetch_primary_email(&self, access_token: &str) -> Option<String> {
        #[derive(Deserialize)]
        struct GithubEmail {
            email: String,
            #[serde(default)]
            primary: bool,
        }

        let response = match self
            .http
            .get(GITHUB_EMAILS_URL)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "GitHub emails lookup failed, continuing without it");
                return None;
            }
        };

        match response.json::<Vec<GithubEmail>>().await {
            Ok(emails) => emails.into_iter().find(|e| e.primary).map(|e| e.email),
            Err(e) => {
                tracing::warn!(error = %e, "GitHub emails response unreadable, continuing without it");
                None
            }
        }
    }
}

impl IdentityProvider for HttpIdentityProvider {
    async fn verify_google_id_token(&self, id_token: &str) -> AuthResult<GoogleTokenInfo> {
        let response = self
            .http
            .get(GOOGLE_TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| AuthError::Upstream(format!("google tokeninfo request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AuthError::ExternalVerificationFailed(format!(
                "google rejected the token: status {}",
                response.status()
            )));
        }

        response
            .json::<GoogleTokenInfo>()
            .await
            .map_err(|e| AuthError::Upstream(format!("unexpected tokeninfo shape: {e}")))
    }

    async fn fetch_github_identity(&self, code: &str) -> AuthResult<GithubIdentity> {
        let (client_id, client_secret) =
            match (&self.github_client_id, &self.github_client_secret) {
                (Some(id), Some(secret)) => (id, secret),
                _ => return Err(AuthError::OAuthNotConfigured),
            };

        #[derive(Serialize)]
        struct TokenRequest<'a> {
            client_id: &'a str,
            client_secret: &'a str,
            code: &'a str,
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: Option<String>,
        }

        let response = self
            .http
            .post(GITHUB_TOKEN_URL)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&TokenRequest {
                client_id,
                client_secret,
                code,
            })
            .send()
            .await
            .map_err(|e| AuthError::Upstream(format!("github code exchange failed: {e}")))?;

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Upstream(format!("unexpected token response shape: {e}")))?;

        let access_token = token.access_token.ok_or_else(|| {
            AuthError::ExternalVerificationFailed(
                "github rejected the authorization code".to_string(),
            )
        })?;

        #[derive(Deserialize)]
        struct GithubUser {
            login: String,
            #[serde(default)]
            name: Option<String>,
            #[serde(default)]
            email: Option<String>,
        }

        let user: GithubUser = self
            .http
            .get(GITHUB_USER_URL)
            .bearer_auth(&access_token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| AuthError::Upstream(format!("github user request failed: {e}")))?
            .error_for_status()
            .map_err(|e| AuthError::Upstream(format!("github user endpoint: {e}")))?
            .json()
            .await
            .map_err(|e| AuthError::Upstream(format!("unexpected github user shape: {e}")))?;

        // GitHub only exposes the profile email when the user made it
        // public; otherwise ask the emails endpoint for the primary one.
        let mut email = user.email.filter(|e| !e.is_empty());
        if email.is_none() {
            email = self.fetch_primary_email(&access_token).await;
        }

        Ok(GithubIdentity {
            login: user.login,
            name: user.name,
            email,
        })
    }
}
