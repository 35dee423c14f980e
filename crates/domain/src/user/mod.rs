//! Users and their roles.

mod password;
mod service;

pub use password::Password;
pub use service::UserService;

use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The role a user acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl UserRole {
    /// Returns the role name as stored and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::User => "USER",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(UserRole::Admin),
            "USER" => Ok(UserRole::User),
            other => Err(DomainError::InvalidUserRole(other.to_string())),
        }
    }
}

/// A registered user.
///
/// `id` and the timestamps are `None` until the user is first saved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct User {
    pub id: Option<UserId>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub cellphone: String,
    pub password: Password,
    pub role: UserRole,
    pub date_created: Option<DateTime<Utc>>,
    pub date_updated: Option<DateTime<Utc>>,
}
