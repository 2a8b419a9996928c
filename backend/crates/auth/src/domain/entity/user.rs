//! User Entity
//!
//! A staff account: profile attributes plus the optional password hash.
//! Accounts created through SSO carry no hash and can only authenticate
//! via the external identity bridge.

use chrono::{DateTime, Utc};
use kernel::id::{DepartmentId, UserId};
use platform::password::HashedPassword;

use crate::domain::value_object::{Email, UserName};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub id: UserId,
    /// Display name
    pub name: UserName,
    /// Email (unique, stored case-sensitive)
    pub email: Email,
    /// Argon2id hash; `None` for SSO-only accounts
    pub password_hash: Option<HashedPassword>,
    /// Department the user belongs to
    pub department_id: DepartmentId,
    /// Aggregated feedback score (profile data, unused by auth)
    pub feedback_rating: i32,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(
        name: UserName,
        email: Email,
        password_hash: Option<HashedPassword>,
        department_id: DepartmentId,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::new(),
            name,
            email,
            password_hash,
            department_id,
            feedback_rating: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this account can only sign in through SSO
    pub fn is_sso_only(&self) -> bool {
        self.password_hash.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::ClearTextPassword;

    fn name() -> UserName {
        UserName::new("Kari Nordmann").unwrap()
    }

    fn email() -> Email {
        Email::new("kari@example.com").unwrap()
    }

    #[test]
    fn test_new_user_with_password() {
        let hash = ClearTextPassword::new("Secret123".to_string())
            .unwrap()
            .hash()
            .unwrap();
        let user = User::new(name(), email(), Some(hash), DepartmentId::new());
        assert!(!user.is_sso_only());
        assert_eq!(user.feedback_rating, 0);
    }

    #[test]
    fn test_sso_only_user() {
        let user = User::new(name(), email(), None, DepartmentId::new());
        assert!(user.is_sso_only());
    }
}
