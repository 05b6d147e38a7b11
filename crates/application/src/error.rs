//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors surfaced by the client layer
///
/// Errors are cloneable: a shared in-flight query hands the same failure to
/// every waiter, and rejected cache entries keep theirs until refetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// Client-side validation failed; no request was sent
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The backend could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The backend rejected the request
    #[error("HTTP {status}: {detail}")]
    HttpStatus {
        /// Response status code
        status: u16,
        /// Text of the body's `detail` or `message` field
        detail: String,
    },

    /// The response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Arguments could not be turned into a request
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// No endpoint with this name is registered
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// Endpoint was called through the wrong operation
    #[error("Endpoint {name} is not a {expected}")]
    WrongEndpointKind {
        name: String,
        expected: &'static str,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Check if retrying the same call could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// HTTP status code, if the backend answered
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text for a transient user notification
    ///
    /// Uses the backend's detail when it sent one, the validation message for
    /// client-side failures, and `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::HttpStatus { detail, .. } if !detail.trim().is_empty() => detail.clone(),
            Self::Domain(err) => err.to_string(),
            _ => fallback.to_string(),
        }
    }
}
