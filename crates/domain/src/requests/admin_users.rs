//! Payloads of the admin user-management panel

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{basic_password, confirmation_matches};
use crate::value_objects::{Password, Role};

/// Filters and paging of the user listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListQuery {
    /// Free-text search over name and email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl UserListQuery {
    /// Listing page with the panel's page size
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Add a search term; blank terms are dropped
    #[must_use]
    pub fn with_search(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        self.q = (!q.trim().is_empty()).then_some(q);
        self
    }

    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Query-string pairs in `q, role, page, limit` order
    ///
    /// Empty search terms and zero page/limit values are omitted.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("q".to_string(), q.to_string()));
        }
        if let Some(role) = self.role {
            pairs.push(("role".to_string(), role.to_string()));
        }
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

/// Create an account from the admin panel
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "create_confirmation"))]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "basic_password"))]
    pub password: Password,
    pub role: Role,
    #[serde(skip)]
    pub confirm_password: Option<Password>,
}

fn create_confirmation(request: &CreateUserRequest) -> Result<(), ValidationError> {
    confirmation_matches(Some(&request.password), request.confirm_password.as_ref())
}

/// Partial update of an account; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "update_confirmation"))]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "basic_password"))]
    pub password: Option<Password>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip)]
    pub confirm_password: Option<Password>,
}

impl UpdateUserRequest {
    /// Whether the update would change the account's role
    pub fn changes_role(&self) -> bool {
        self.role.is_some()
    }
}

fn update_confirmation(request: &UpdateUserRequest) -> Result<(), ValidationError> {
    confirmation_matches(request.password.as_ref(), request.confirm_password.as_ref())
}

/// Body of the role patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRoleRequest {
    pub role: Role,
}

/// Body of the password patch
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(custom(function = "basic_password"))]
    pub password: Password,
}
