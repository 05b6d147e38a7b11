//! Authentication payloads for the user and admin sessions

use serde::Serialize;
use validator::{Validate, ValidationError};

use super::{
    alphanumeric_password, confirmation_matches, present_password, strong_password,
};
use crate::value_objects::Password;

/// Self-service account registration
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, message = "Full Name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "strong_password"))]
    pub password: Password,
}

/// Staff self-registration
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdminRequest {
    #[validate(length(min = 1, message = "Full Name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "alphanumeric_password"))]
    pub password: Password,
}

/// Credentials for either login form
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "present_password"))]
    pub password: Password,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<Password>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Ask the backend to email a reset link
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Consume a reset token and set a new password
#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "reset_confirmation"))]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Reset token is missing"))]
    pub token: String,
    #[serde(rename = "newPassword")]
    #[validate(custom(function = "strong_password"))]
    pub new_password: Password,
    /// Confirmation field of the form; never sent
    #[serde(skip)]
    pub confirm_password: Option<Password>,
}

fn reset_confirmation(request: &ResetPasswordRequest) -> Result<(), ValidationError> {
    confirmation_matches(
        Some(&request.new_password),
        request.confirm_password.as_ref(),
    )
}
