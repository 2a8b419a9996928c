//! In-Memory Repository Implementation
//!
//! Identity storage backed by process memory. Used by the test suite and
//! for running the API locally without PostgreSQL. Departments keep their
//! insertion order, which also defines the default department.

use std::sync::{Arc, RwLock};

use kernel::id::{DepartmentId, UserId};

use crate::domain::entity::{department::Department, user::User};
use crate::domain::repository::{DepartmentRepository, UserRepository};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    departments: Vec<Department>,
}

/// In-memory identity repository
#[derive(Clone, Default)]
pub struct InMemoryIdentityRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a department directly (test/local setup)
    pub fn add_department(&self, department: Department) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.departments.push(department);
    }

    /// Number of stored users (test assertions)
    pub fn user_count(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .users
            .len()
    }
}

impl UserRepository for InMemoryIdentityRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());

        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }

        inner.users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> AuthResult<Option<User>> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.users.iter().find(|u| &u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.users.iter().find(|u| &u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.users.iter().any(|u| &u.email == email))
    }
}

impl DepartmentRepository for InMemoryIdentityRepository {
    async fn find_department(&self, id: &DepartmentId) -> AuthResult<Option<Department>> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.departments.iter().find(|d| &d.id == id).cloned())
    }

    async fn default_department(&self) -> AuthResult<Option<Department>> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.departments.first().cloned())
    }

    async fn list_departments(&self) -> AuthResult<Vec<Department>> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.departments.clone())
    }
}
