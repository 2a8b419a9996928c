//! Register Use Case
//!
//! Creates a new staff account and signs the user in.

use std::sync::Arc;

use kernel::id::DepartmentId;
use platform::password::ClearTextPassword;
use uuid::Uuid;

use crate::application::login::AuthOutput;
use crate::application::token::TokenService;
use crate::domain::entity::user::User;
use crate::domain::repository::{DepartmentRepository, UserRepository};
use crate::domain::value_object::{Email, UserName};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub department_id: Uuid,
}

/// Register use case
pub struct RegisterUseCase<U, D>
where
    U: UserRepository,
    D: DepartmentRepository,
{
    users: Arc<U>,
    departments: Arc<D>,
    tokens: Arc<TokenService>,
}

impl<U, D> RegisterUseCase<U, D>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<AuthOutput> {
        let name = UserName::new(&input.name)?;
        let email = Email::new(&input.email)?;

        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        // Email uniqueness is enforced at creation time; the unique index
        // in the migration backstops concurrent registrations.
        if self.users.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let department_id = DepartmentId::from_uuid(input.department_id);
        let department = self
            .departments
            .find_department(&department_id)
            .await?
            .ok_or_else(|| AuthError::Validation("Unknown department".to_string()))?;

        let hash = password
            .hash()
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = User::new(name, email, Some(hash), department_id);
        self.users.create(&user).await?;

        let token = self.tokens.issue(&user.id, &user.email)?;

        tracing::info!(user_id = %user.id, department_id = %department.id, "User registered");

        Ok(AuthOutput {
            token,
            user,
            department: Some(department),
        })
    }
}
