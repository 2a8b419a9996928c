//! User Name Value Object
//!
//! A user's display name as it appears in the staff directory.
//!
//! ## 不変条件
//! - 長さ: 2〜100文字（トリム後）
//! - 使用可能文字: 文字（Unicode letter）、スペース、ハイフン、アポストロフィ

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum length for a display name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 2;

/// Maximum length for a display name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 100;

/// Display name value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    /// Create a new display name with validation
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into().trim().to_string();

        let char_count = name.chars().count();
        if char_count < USER_NAME_MIN_LENGTH || char_count > USER_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be {} to {} characters",
                USER_NAME_MIN_LENGTH, USER_NAME_MAX_LENGTH
            )));
        }

        if !name
            .chars()
            .all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'')
        {
            return Err(AppError::bad_request(
                "Name may only contain letters, spaces, hyphens, or apostrophes",
            ));
        }

        Ok(Self(name))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to string for database storage
    pub fn into_db(self) -> String {
        self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_valid() {
        assert!(UserName::new("Kari Nordmann").is_ok());
        assert!(UserName::new("Anne-Marie O'Brien").is_ok());
        assert!(UserName::new("Åse Sørensen").is_ok());
    }

    #[test]
    fn test_name_too_short() {
        assert!(UserName::new("A").is_err());
        assert!(UserName::new("").is_err());
    }

    #[test]
    fn test_name_too_long() {
        let long = "a".repeat(USER_NAME_MAX_LENGTH + 1);
        assert!(UserName::new(long).is_err());
    }

    #[test]
    fn test_name_invalid_characters() {
        assert!(UserName::new("Robert; DROP TABLE users").is_err());
        assert!(UserName::new("user42").is_err());
        assert!(UserName::new("<script>").is_err());
    }

    #[test]
    fn test_name_trims_whitespace() {
        let name = UserName::new("  Kari Nordmann  ").unwrap();
        assert_eq!(name.as_str(), "Kari Nordmann");
    }
}
