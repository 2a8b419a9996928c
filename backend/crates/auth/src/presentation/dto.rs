//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::{department::Department, user::User};

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub department_id: Uuid,
}

// ============================================================================
// SSO
// ============================================================================

/// SSO request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsoRequest {
    /// "google" or "github"
    pub provider: String,
    pub id_token: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub department_id: Option<Uuid>,
}

/// GitHub OAuth callback query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct GithubCallbackQuery {
    pub code: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

/// Department as exposed on the wire
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDto {
    pub id: Uuid,
    pub name: String,
}

impl From<&Department> for DepartmentDto {
    fn from(department: &Department) -> Self {
        Self {
            id: *department.id.as_uuid(),
            name: department.name.clone(),
        }
    }
}

/// User as exposed on the wire (never includes the password hash)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department_id: Uuid,
    pub feedback_rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentDto>,
}

impl UserDto {
    pub fn from_user(user: &User, department: Option<&Department>) -> Self {
        Self {
            id: *user.id.as_uuid(),
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            department_id: *user.department_id.as_uuid(),
            feedback_rating: user.feedback_rating,
            department: department.map(DepartmentDto::from),
        }
    }
}

/// Response for every authentication entry point
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{Email, UserName};
    use kernel::id::DepartmentId;

    #[test]
    fn test_user_dto_never_leaks_password_hash() {
        let user = User::new(
            UserName::new("Kari Nordmann").unwrap(),
            Email::new("kari@example.com").unwrap(),
            Some(
                platform::password::ClearTextPassword::new("Secret123".to_string())
                    .unwrap()
                    .hash()
                    .unwrap(),
            ),
            DepartmentId::new(),
        );

        let dto = UserDto::from_user(&user, None);
        let json = serde_json::to_string(&dto).unwrap();

        assert!(!json.contains("argon2"));
        assert!(!json.contains("passwordHash"));
        assert!(json.contains("kari@example.com"));
    }

    #[test]
    fn test_department_omitted_when_absent() {
        let user = User::new(
            UserName::new("Kari Nordmann").unwrap(),
            Email::new("kari@example.com").unwrap(),
            None,
            DepartmentId::new(),
        );

        let json = serde_json::to_string(&UserDto::from_user(&user, None)).unwrap();
        assert!(!json.contains("\"department\""));
    }
}
