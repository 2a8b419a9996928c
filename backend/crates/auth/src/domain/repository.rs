//! Repository Traits
//!
//! Interfaces for identity persistence. Implementations live in the
//! infrastructure layer (`infra::postgres`, `infra::memory`).

use kernel::id::{DepartmentId, UserId};

use crate::domain::entity::{department::Department, user::User};
use crate::domain::value_object::Email;
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user; the email must not already exist
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email (exact, case-sensitive)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;
}

/// Department repository trait
#[trait_variant::make(DepartmentRepository: Send)]
pub trait LocalDepartmentRepository {
    /// Find a department by ID
    async fn find_department(&self, id: &DepartmentId) -> AuthResult<Option<Department>>;

    /// The default department for SSO sign-ups (oldest first)
    async fn default_department(&self) -> AuthResult<Option<Department>>;

    /// List all departments
    async fn list_departments(&self) -> AuthResult<Vec<Department>>;
}
