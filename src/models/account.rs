use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An application account. Roles are bare names (`"ADMIN"`, `"USER"`),
/// loaded eagerly with the user; the authentication adapter adds the
/// `ROLE_` prefix when it hands credentials to the authorization layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    /// PHC-format password hash. Never holds a cleartext password.
    pub password_hash: String,
    pub roles: Vec<String>,
}

impl AppUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            roles: Vec::new(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// A role. The name is its own identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRole {
    pub role: String,
}

impl AppRole {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }
}
