//! Password value object
//!
//! Wraps a plaintext password on its way to the backend so it never shows up
//! in `Debug` output or logs. The policies mirror the rules of the forms that
//! collect them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Rules a password must satisfy, depending on where it was entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordPolicy {
    /// Any non-empty value (login forms)
    Present,
    /// At least 6 characters (admin-managed accounts)
    Basic,
    /// At least 8 ASCII letters/digits with one letter and one digit
    /// (admin self-registration)
    Alphanumeric,
    /// At least 8 characters with lowercase, uppercase, digit and special
    /// character (user registration and password reset)
    Strong,
}

/// A plaintext password
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    /// Wrap a plaintext password without checking it
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the plaintext
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Describe how the password violates a policy, if it does
    pub fn violation(&self, policy: PasswordPolicy) -> Option<&'static str> {
        let value = self.0.as_str();
        let length = value.chars().count();

        match policy {
            PasswordPolicy::Present if value.is_empty() => Some("Password is required"),
            PasswordPolicy::Basic if length < 6 => Some("Password must be at least 6 characters"),
            PasswordPolicy::Alphanumeric => {
                let valid = length >= 8
                    && value.chars().all(|c| c.is_ascii_alphanumeric())
                    && value.chars().any(|c| c.is_ascii_alphabetic())
                    && value.chars().any(|c| c.is_ascii_digit());
                (!valid).then_some("Min 8 chars with a letter and a number")
            },
            PasswordPolicy::Strong => {
                let valid = length >= 8
                    && value.chars().any(char::is_lowercase)
                    && value.chars().any(char::is_uppercase)
                    && value.chars().any(|c| c.is_ascii_digit())
                    && value
                        .chars()
                        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());
                (!valid).then_some(
                    "Password must be at least 8 characters long and include uppercase, \
                     lowercase, number, and special character",
                )
            },
            _ => None,
        }
    }

    /// Check the password against a policy
    pub fn check(&self, policy: PasswordPolicy) -> Result<(), DomainError> {
        match self.violation(policy) {
            Some(reason) => Err(DomainError::InvalidPassword(reason.to_string())),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self(value)
    }
}
