//! Department Entity

use chrono::{DateTime, Utc};
use kernel::id::DepartmentId;

/// Department entity
///
/// Referenced by users as their group; SSO sign-ups without an explicit
/// department are assigned the oldest one as the default.
#[derive(Debug, Clone)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Department {
    /// Create a new department
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: DepartmentId::new(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
