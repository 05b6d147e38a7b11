//! Invalidation tags
//!
//! A tag carries no value. Query endpoints declare the tags their results
//! provide; mutations declare the tags they invalidate. Matching follows two
//! rules:
//! - a type-only tag (`AdminUsers`) invalidates every provided tag of that type
//! - an id tag (`AdminUsers:7`) invalidates only providers of that exact id

use std::fmt;

use domain::PrincipalKind;
use serde_json::Value;

/// Tag type of the admin user listing and user records
pub const ADMIN_USERS: &str = "AdminUsers";
/// Tag type of the project listing and project records
pub const PROJECTS: &str = "Projects";
/// Provided by every query whose result depends on the logged-in user
pub const USER_SESSION: &str = "Session";
/// Provided by every query whose result depends on the logged-in admin
pub const ADMIN_SESSION: &str = "AdminSession";

/// Invalidation label
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    kind: &'static str,
    id: Option<String>,
}

impl Tag {
    /// Type-only tag, used for listings
    pub const fn list(kind: &'static str) -> Self {
        Self { kind, id: None }
    }

    /// Tag of one record
    pub fn item(kind: &'static str, id: impl fmt::Display) -> Self {
        Self {
            kind,
            id: Some(id.to_string()),
        }
    }

    /// Tag tying an entry to the session of `kind`
    pub const fn session(kind: PrincipalKind) -> Self {
        match kind {
            PrincipalKind::User => Self::list(USER_SESSION),
            PrincipalKind::Admin => Self::list(ADMIN_SESSION),
        }
    }

    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether invalidating `self` stales an entry that provided `provided`
    pub fn invalidates(&self, provided: &Self) -> bool {
        if self.kind != provided.kind {
            return false;
        }
        match &self.id {
            None => true,
            Some(id) => provided.id.as_ref() == Some(id),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}:{id}", self.kind),
            None => f.write_str(self.kind),
        }
    }
}

/// Read an id out of endpoint arguments
///
/// Arguments are either the id itself (`3`) or an object holding it under
/// `field` (`{"id": 3, ...}`). Numbers and strings are accepted.
pub fn id_from_args(args: &Value, field: &str) -> Option<String> {
    let value = match args {
        Value::Object(map) => map.get(field)?,
        other => other,
    };
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
