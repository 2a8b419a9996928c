//! HTTP Handlers

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Extension;
use std::sync::Arc;

use crate::application::login::{AuthOutput, LoginInput, LoginUseCase};
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::application::sso::{IdentityProvider, SsoInput, SsoUseCase};
use crate::application::token::TokenService;
use crate::domain::repository::{DepartmentRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AuthResponse, DepartmentDto, GithubCallbackQuery, LoginRequest, RegisterRequest, SsoRequest,
    UserDto,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R, P>
where
    R: UserRepository + DepartmentRepository + Clone + Send + Sync + 'static,
    P: IdentityProvider + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub provider: Arc<P>,
    pub tokens: Arc<TokenService>,
}

fn to_auth_response(output: AuthOutput) -> AuthResponse {
    AuthResponse {
        token: output.token,
        user: UserDto::from_user(&output.user, output.department.as_ref()),
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + DepartmentRepository + Clone + Send + Sync + 'static,
    P: IdentityProvider + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.repo.clone(), state.tokens.clone());

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(to_auth_response(output)))
}

// ============================================================================
// Register
// ============================================================================

/// POST /auth/register
pub async fn register<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + DepartmentRepository + Clone + Send + Sync + 'static,
    P: IdentityProvider + Clone + Send + Sync + 'static,
{
    let use_case =
        RegisterUseCase::new(state.repo.clone(), state.repo.clone(), state.tokens.clone());

    let output = use_case
        .execute(RegisterInput {
            name: req.name,
            email: req.email,
            password: req.password,
            department_id: req.department_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(to_auth_response(output))))
}

// ============================================================================
// SSO
// ============================================================================

/// POST /auth/sso
pub async fn sso_login<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Json(req): Json<SsoRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + DepartmentRepository + Clone + Send + Sync + 'static,
    P: IdentityProvider + Clone + Send + Sync + 'static,
{
    let use_case = SsoUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.provider.clone(),
        state.tokens.clone(),
    );

    let output = use_case
        .execute(SsoInput {
            provider: req.provider,
            id_token: req.id_token,
            email: req.email,
            name: req.name,
            department_id: req.department_id,
        })
        .await?;

    Ok(Json(to_auth_response(output)))
}

/// GET /auth/github/callback
pub async fn github_callback<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Query(query): Query<GithubCallbackQuery>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + DepartmentRepository + Clone + Send + Sync + 'static,
    P: IdentityProvider + Clone + Send + Sync + 'static,
{
    let code = query.code.unwrap_or_default();

    let use_case = SsoUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.provider.clone(),
        state.tokens.clone(),
    );

    let output = use_case.github_callback(&code).await?;

    Ok(Json(to_auth_response(output)))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /users/me (behind `require_auth`)
pub async fn me<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Extension(current): Extension<CurrentUser>,
) -> AuthResult<Json<UserDto>>
where
    R: UserRepository + DepartmentRepository + Clone + Send + Sync + 'static,
    P: IdentityProvider + Clone + Send + Sync + 'static,
{
    // A valid token for an identity that no longer exists gets the same
    // opaque 401 as any other authentication failure.
    let user = state
        .repo
        .find_by_id(&current.user_id)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let department = state.repo.find_department(&user.department_id).await?;

    Ok(Json(UserDto::from_user(&user, department.as_ref())))
}

// ============================================================================
// Departments
// ============================================================================

/// GET /departments (behind `optional_auth`)
pub async fn list_departments<R, P>(
    State(state): State<AuthAppState<R, P>>,
    current: Option<Extension<CurrentUser>>,
) -> AuthResult<Json<Vec<DepartmentDto>>>
where
    R: UserRepository + DepartmentRepository + Clone + Send + Sync + 'static,
    P: IdentityProvider + Clone + Send + Sync + 'static,
{
    if let Some(Extension(current)) = &current {
        tracing::debug!(user_id = %current.user_id, "Departments listed by signed-in user");
    }

    let departments = state.repo.list_departments().await?;

    Ok(Json(
        departments.iter().map(DepartmentDto::from).collect(),
    ))
}
