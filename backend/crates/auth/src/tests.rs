//! Use-case tests for the auth crate
//!
//! Run against the in-memory repository and a stubbed identity provider;
//! no database or network required.

use std::sync::Arc;
use std::time::Duration;

use crate::application::login::{LoginInput, LoginUseCase};
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::application::sso::{
    GithubIdentity, GoogleTokenInfo, IdentityProvider, SsoInput, SsoUseCase,
};
use crate::application::token::TokenService;
use crate::domain::entity::department::Department;
use crate::error::{AuthError, AuthResult};
use crate::infra::memory::InMemoryIdentityRepository;

// ============================================================================
// Fixtures
// ============================================================================

/// Stub identity provider with canned responses
#[derive(Clone, Default)]
struct StubProvider {
    google: Option<GoogleTokenInfo>,
    github: Option<GithubIdentity>,
}

impl IdentityProvider for StubProvider {
    async fn verify_google_id_token(&self, _id_token: &str) -> AuthResult<GoogleTokenInfo> {
        self.google.clone().ok_or_else(|| {
            AuthError::ExternalVerificationFailed("invalid token".to_string())
        })
    }

    async fn fetch_github_identity(&self, _code: &str) -> AuthResult<GithubIdentity> {
        self.github.clone().ok_or(AuthError::OAuthNotConfigured)
    }
}

struct Fixture {
    repo: Arc<InMemoryIdentityRepository>,
    tokens: Arc<TokenService>,
    department: Department,
}

fn fixture() -> Fixture {
    let repo = Arc::new(InMemoryIdentityRepository::new());
    let department = Department::new("Engineering");
    repo.add_department(department.clone());

    Fixture {
        repo,
        tokens: Arc::new(TokenService::new(b"test-secret", Duration::from_secs(24 * 3600))),
        department,
    }
}

impl Fixture {
    fn login(&self) -> LoginUseCase<InMemoryIdentityRepository, InMemoryIdentityRepository> {
        LoginUseCase::new(self.repo.clone(), self.repo.clone(), self.tokens.clone())
    }

    fn register(&self) -> RegisterUseCase<InMemoryIdentityRepository, InMemoryIdentityRepository> {
        RegisterUseCase::new(self.repo.clone(), self.repo.clone(), self.tokens.clone())
    }

    fn sso(
        &self,
        provider: StubProvider,
    ) -> SsoUseCase<InMemoryIdentityRepository, InMemoryIdentityRepository, StubProvider> {
        SsoUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            Arc::new(provider),
            self.tokens.clone(),
        )
    }

    fn register_input(&self) -> RegisterInput {
        RegisterInput {
            name: "Kari Nordmann".to_string(),
            email: "a@x.com".to_string(),
            password: "Secret123".to_string(),
            department_id: *self.department.id.as_uuid(),
        }
    }
}

fn verified_google(email: &str) -> GoogleTokenInfo {
    GoogleTokenInfo {
        email: email.to_string(),
        email_verified: "true".to_string(),
        name: "Kari Nordmann".to_string(),
    }
}

// ============================================================================
// Register + Login
// ============================================================================

mod register_login {
    use super::*;

    #[tokio::test]
    async fn test_register_then_login_roundtrip() {
        let fx = fixture();

        let registered = fx.register().execute(fx.register_input()).await.unwrap();
        let registered_id = registered.user.id;

        // The registration token already identifies the new account.
        let claims = fx.tokens.validate(&registered.token).unwrap();
        assert_eq!(claims.sub, registered_id.to_string());

        // Logging in with the same credentials yields a token for the
        // same subject.
        let logged_in = fx
            .login()
            .execute(LoginInput {
                email: "a@x.com".to_string(),
                password: "Secret123".to_string(),
            })
            .await
            .unwrap();

        let claims = fx.tokens.validate(&logged_in.token).unwrap();
        assert_eq!(claims.sub, registered_id.to_string());
        assert_eq!(claims.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_login_wrong_password_rejected() {
        let fx = fixture();
        fx.register().execute(fx.register_input()).await.unwrap();

        let result = fx
            .login()
            .execute(LoginInput {
                email: "a@x.com".to_string(),
                password: "Secret124".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_rejected() {
        let fx = fixture();

        let result = fx
            .login()
            .execute(LoginInput {
                email: "nobody@x.com".to_string(),
                password: "Secret123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_rejected() {
        let fx = fixture();
        fx.register().execute(fx.register_input()).await.unwrap();

        let result = fx.register().execute(fx.register_input()).await;
        assert!(matches!(result, Err(AuthError::EmailTaken)));
        assert_eq!(fx.repo.user_count(), 1);
    }

    #[tokio::test]
    async fn test_register_weak_password_rejected() {
        let fx = fixture();
        let input = RegisterInput {
            password: "secret123".to_string(),
            ..fx.register_input()
        };

        let result = fx.register().execute(input).await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_unknown_department_rejected() {
        let fx = fixture();
        let input = RegisterInput {
            department_id: uuid::Uuid::new_v4(),
            ..fx.register_input()
        };

        let result = fx.register().execute(input).await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }
}

// ============================================================================
// SSO
// ============================================================================

mod sso {
    use super::*;

    fn google_input() -> SsoInput {
        SsoInput {
            provider: "google".to_string(),
            id_token: Some("provider-token".to_string()),
            email: None,
            name: None,
            department_id: None,
        }
    }

    #[tokio::test]
    async fn test_first_sso_creates_exactly_one_identity() {
        let fx = fixture();
        let sso = fx.sso(StubProvider {
            google: Some(verified_google("sso@x.com")),
            ..Default::default()
        });

        let first = sso.execute(google_input()).await.unwrap();
        assert!(first.user.is_sso_only());
        assert_eq!(first.user.department_id, fx.department.id);
        assert_eq!(fx.repo.user_count(), 1);

        // The second attempt with the same email reuses the identity.
        let second = sso.execute(google_input()).await.unwrap();
        assert_eq!(second.user.id, first.user.id);
        assert_eq!(fx.repo.user_count(), 1);
    }

    #[tokio::test]
    async fn test_unverified_google_email_always_rejected() {
        let fx = fixture();
        let sso = fx.sso(StubProvider {
            google: Some(GoogleTokenInfo {
                email_verified: "false".to_string(),
                ..verified_google("sso@x.com")
            }),
            ..Default::default()
        });

        let result = sso.execute(google_input()).await;
        assert!(matches!(
            result,
            Err(AuthError::ExternalVerificationFailed(_))
        ));
        assert_eq!(fx.repo.user_count(), 0);
    }

    #[tokio::test]
    async fn test_google_without_id_token_rejected() {
        let fx = fixture();
        let sso = fx.sso(StubProvider::default());

        let input = SsoInput {
            id_token: None,
            ..google_input()
        };

        assert!(matches!(
            sso.execute(input).await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_sso_reuses_password_account_with_same_email() {
        let fx = fixture();
        fx.register().execute(fx.register_input()).await.unwrap();

        let sso = fx.sso(StubProvider {
            google: Some(verified_google("a@x.com")),
            ..Default::default()
        });

        let output = sso.execute(google_input()).await.unwrap();
        assert!(!output.user.is_sso_only());
        assert_eq!(fx.repo.user_count(), 1);
    }

    #[tokio::test]
    async fn test_github_body_variant_uses_supplied_profile() {
        let fx = fixture();
        let sso = fx.sso(StubProvider::default());

        let output = sso
            .execute(SsoInput {
                provider: "github".to_string(),
                id_token: None,
                email: Some("gh@x.com".to_string()),
                name: Some("Kari Nordmann".to_string()),
                department_id: None,
            })
            .await
            .unwrap();

        assert_eq!(output.user.email.as_str(), "gh@x.com");
        assert!(output.user.is_sso_only());
    }

    #[tokio::test]
    async fn test_unsupported_provider_rejected() {
        let fx = fixture();
        let sso = fx.sso(StubProvider::default());

        let result = sso
            .execute(SsoInput {
                provider: "gitlab".to_string(),
                id_token: None,
                email: Some("a@x.com".to_string()),
                name: None,
                department_id: None,
            })
            .await;

        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_explicit_department_assigned() {
        let fx = fixture();
        let other = Department::new("Support");
        fx.repo.add_department(other.clone());

        let sso = fx.sso(StubProvider {
            google: Some(verified_google("sso@x.com")),
            ..Default::default()
        });

        let input = SsoInput {
            department_id: Some(*other.id.as_uuid()),
            ..google_input()
        };

        let output = sso.execute(input).await.unwrap();
        assert_eq!(output.user.department_id, other.id);
    }

    #[tokio::test]
    async fn test_no_default_department_fails() {
        let repo = Arc::new(InMemoryIdentityRepository::new());
        let tokens = Arc::new(TokenService::new(b"test-secret", Duration::from_secs(3600)));
        let sso = SsoUseCase::new(
            repo.clone(),
            repo.clone(),
            Arc::new(StubProvider {
                google: Some(verified_google("sso@x.com")),
                ..Default::default()
            }),
            tokens,
        );

        let result = sso.execute(google_input()).await;
        assert!(matches!(result, Err(AuthError::NoDefaultDepartment)));
    }

    #[tokio::test]
    async fn test_sso_account_cannot_password_login() {
        let fx = fixture();
        let sso = fx.sso(StubProvider {
            google: Some(verified_google("sso@x.com")),
            ..Default::default()
        });
        sso.execute(google_input()).await.unwrap();

        let result = fx
            .login()
            .execute(LoginInput {
                email: "sso@x.com".to_string(),
                password: "Secret123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }
}

// ============================================================================
// GitHub callback
// ============================================================================

mod github_callback {
    use super::*;

    fn github_identity() -> GithubIdentity {
        GithubIdentity {
            login: "kari-codes".to_string(),
            name: Some("Kari Nordmann".to_string()),
            email: Some("gh@x.com".to_string()),
        }
    }

    #[tokio::test]
    async fn test_callback_creates_identity() {
        let fx = fixture();
        let sso = fx.sso(StubProvider {
            github: Some(github_identity()),
            ..Default::default()
        });

        let output = sso.github_callback("oauth-code").await.unwrap();
        assert_eq!(output.user.email.as_str(), "gh@x.com");
        assert!(output.user.is_sso_only());
        assert_eq!(fx.repo.user_count(), 1);
    }

    #[tokio::test]
    async fn test_callback_name_falls_back_to_login_handle() {
        let fx = fixture();
        let sso = fx.sso(StubProvider {
            github: Some(GithubIdentity {
                name: None,
                ..github_identity()
            }),
            ..Default::default()
        });

        let output = sso.github_callback("oauth-code").await.unwrap();
        assert_eq!(output.user.name.as_str(), "kari-codes");
    }

    #[tokio::test]
    async fn test_callback_without_email_rejected() {
        let fx = fixture();
        let sso = fx.sso(StubProvider {
            github: Some(GithubIdentity {
                email: None,
                ..github_identity()
            }),
            ..Default::default()
        });

        let result = sso.github_callback("oauth-code").await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_callback_without_code_rejected() {
        let fx = fixture();
        let sso = fx.sso(StubProvider {
            github: Some(github_identity()),
            ..Default::default()
        });

        let result = sso.github_callback("").await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_callback_reuses_existing_identity() {
        let fx = fixture();
        let sso = fx.sso(StubProvider {
            github: Some(github_identity()),
            ..Default::default()
        });

        let first = sso.github_callback("code-one").await.unwrap();
        let second = sso.github_callback("code-two").await.unwrap();

        assert_eq!(first.user.id, second.user.id);
        assert_eq!(fx.repo.user_count(), 1);
    }
}
