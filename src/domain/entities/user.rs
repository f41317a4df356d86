//! Users, roles and the menu entries a role grants.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Name of the role allowed to manage domains and trigger rotation.
pub const ADMIN_ROLE: &str = "admin";
/// Role given to every account created through the admin CLI.
pub const USER_ROLE: &str = "user";

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub status: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Menu {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub icon: Option<String>,
    pub parent_id: Option<i64>,
    pub sort_order: i32,
}

/// Input data for creating a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
}
