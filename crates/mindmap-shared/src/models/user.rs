use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display name recorded for comments and donations made without a login.
pub const ANONYMOUS: &str = "anonymous";

/// Reserved actor id that browses without edit rights.
pub const GUEST_ID: &str = "guest";

/// A stored account. Passwords are compared in plaintext on purpose:
/// credential hardening is out of scope for this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// The acting identity threaded through permission checks and mutations.
/// `Option<&Actor>` is used wherever anonymous access is possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.is_admin || self.id == "admin"
    }

    pub fn is_guest(&self) -> bool {
        self.id == GUEST_ID
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            is_admin: user.is_admin,
        }
    }
}
