//! Infrastructure errors

use application::ApplicationError;
use thiserror::Error;

/// Failures while wiring up adapters
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// Configuration sources could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The tracing subscriber could not be installed
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

impl From<InfrastructureError> for ApplicationError {
    fn from(err: InfrastructureError) -> Self {
        Self::Configuration(err.to_string())
    }
}
