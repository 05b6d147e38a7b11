//! Authenticated principal held by a session

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::{Role, UserId};

/// Which session a principal belongs to
///
/// User and admin sessions are independent and never share storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    /// Story author logged in through `/auth`
    User,
    /// Staff member logged in through `/admin/auth`
    Admin,
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

/// The logged-in account as returned by login and load-current-user calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Backend id
    pub id: UserId,
    /// Display name
    pub full_name: String,
    /// Login email
    pub email: String,
    /// Role, when the backend reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Principal {
    /// Whether the backend reported this principal as an admin
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}
