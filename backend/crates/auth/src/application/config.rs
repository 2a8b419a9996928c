//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Auth application configuration
///
/// There is intentionally no `Default`: the signing secret is required
/// and the binary refuses to start without one. A silently substituted
/// development secret is how stolen-token incidents happen.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for token signing
    pub jwt_secret: Vec<u8>,
    /// Token lifetime (24 hours)
    pub token_ttl: Duration,
    /// GitHub OAuth app client id
    pub github_client_id: Option<String>,
    /// GitHub OAuth app client secret
    pub github_client_secret: Option<String>,
}

impl AuthConfig {
    /// Create config with the given signing secret and a 24 h token TTL
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::from_secs(24 * 3600),
            github_client_id: None,
            github_client_secret: None,
        }
    }

    /// Attach GitHub OAuth credentials
    pub fn with_github(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.github_client_id = Some(client_id.into());
        self.github_client_secret = Some(client_secret.into());
        self
    }

    /// Whether the GitHub OAuth flow can be served
    pub fn github_configured(&self) -> bool {
        self.github_client_id.is_some() && self.github_client_secret.is_some()
    }
}
