//! Request payloads sent to the backend
//!
//! Every payload carries the validation rules of the form that produces it.
//! [`validate_request`] must pass before a payload is handed to the client;
//! a failing payload never reaches the network.

mod admin_users;
mod auth;
mod projects;

use std::borrow::Cow;

use validator::{Validate, ValidationError};

pub use admin_users::{
    CreateUserRequest, UpdatePasswordRequest, UpdateUserRequest, UpdateUserRoleRequest,
    UserListQuery,
};
pub use auth::{
    ForgotPasswordRequest, LoginRequest, RegisterAdminRequest, RegisterUserRequest,
    ResetPasswordRequest,
};
pub use projects::{CreateProjectRequest, DEFAULT_DURATION_SEC, GenerateSegmentsRequest};

use crate::errors::DomainError;
use crate::value_objects::{Password, PasswordPolicy};

/// Run the payload's validation rules
pub fn validate_request<T: Validate>(request: &T) -> Result<(), DomainError> {
    request.validate().map_err(DomainError::from)
}

fn policy_error(reason: &'static str) -> ValidationError {
    ValidationError::new("password").with_message(Cow::Borrowed(reason))
}

fn check_policy(password: &Password, policy: PasswordPolicy) -> Result<(), ValidationError> {
    password.violation(policy).map_or(Ok(()), |reason| Err(policy_error(reason)))
}

fn present_password(password: &Password) -> Result<(), ValidationError> {
    check_policy(password, PasswordPolicy::Present)
}

fn basic_password(password: &Password) -> Result<(), ValidationError> {
    check_policy(password, PasswordPolicy::Basic)
}

fn alphanumeric_password(password: &Password) -> Result<(), ValidationError> {
    check_policy(password, PasswordPolicy::Alphanumeric)
}

fn strong_password(password: &Password) -> Result<(), ValidationError> {
    check_policy(password, PasswordPolicy::Strong)
}

fn confirmation_matches(
    password: Option<&Password>,
    confirmation: Option<&Password>,
) -> Result<(), ValidationError> {
    match (password, confirmation) {
        (Some(password), Some(confirmation)) if password != confirmation => Err(
            ValidationError::new("confirm_password")
                .with_message(Cow::Borrowed("Passwords do not match")),
        ),
        _ => Ok(()),
    }
}
