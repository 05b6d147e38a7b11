//! Account role value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Role of an account as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Staff account with access to the admin panel
    Admin,
    /// Regular author account
    User,
}

impl Role {
    /// The other role; used by the admin panel's role toggle
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Admin => Self::User,
            Self::User => Self::Admin,
        }
    }

    /// Wire name of the role
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}
