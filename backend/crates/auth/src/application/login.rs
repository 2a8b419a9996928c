//! Login Use Case
//!
//! Authenticates a user by email and password and issues a token.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::token::TokenService;
use crate::domain::entity::{department::Department, user::User};
use crate::domain::repository::{DepartmentRepository, UserRepository};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Output shared by every authentication entry point
pub struct AuthOutput {
    /// Signed bearer token
    pub token: String,
    /// The authenticated user
    pub user: User,
    /// The user's department, when it still exists
    pub department: Option<Department>,
}

/// Login use case
pub struct LoginUseCase<U, D>
where
    U: UserRepository,
    D: DepartmentRepository,
{
    users: Arc<U>,
    departments: Arc<D>,
    tokens: Arc<TokenService>,
}

impl<U, D> LoginUseCase<U, D>
where
    U: UserRepository,
    D: DepartmentRepository,
{
    pub fn new(users: Arc<U>, departments: Arc<D>, tokens: Arc<TokenService>) -> Self {
        Self {
            users,
            departments,
            tokens,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<AuthOutput> {
        let email = Email::new(&input.email)?;

        // Unknown email, wrong password and SSO-only accounts are
        // indistinguishable to the caller.
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .as_ref()
            .ok_or(AuthError::InvalidCredentials)?;

        let candidate = ClearTextPassword::for_verification(input.password);
        if !hash.verify(&candidate) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.id, &user.email)?;
        let department = self.departments.find_department(&user.department_id).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthOutput {
            token,
            user,
            department,
        })
    }
}
