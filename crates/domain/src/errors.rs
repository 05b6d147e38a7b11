//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
///
/// These are raised before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A request payload failed client-side validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Password does not satisfy the policy of the form it was entered in
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    /// Unknown role name
    #[error("Invalid role: {0}. Use 'admin' or 'user'")]
    InvalidRole(String),

    /// Timestamp in a response could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_message() {
        let err = DomainError::Validation("title: required".to_string());
        assert_eq!(err.to_string(), "Validation failed: title: required");
    }

    #[test]
    fn invalid_role_error_message() {
        let err = DomainError::InvalidRole("owner".to_string());
        assert_eq!(err.to_string(), "Invalid role: owner. Use 'admin' or 'user'");
    }

    #[test]
    fn errors_compare_by_value() {
        assert_eq!(
            DomainError::InvalidPassword("too short".into()),
            DomainError::InvalidPassword("too short".into())
        );
        assert_ne!(
            DomainError::InvalidPassword("too short".into()),
            DomainError::Validation("too short".into())
        );
    }
}
