//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application's transport port over `reqwest`, loads the
//! client configuration and installs log output.

pub mod config;
pub mod error;
pub mod http;
pub mod telemetry;

use std::sync::Arc;

use application::{ApiClient, QueryCacheConfig};

pub use config::{ApiConfig, AppConfig, CacheConfig, LoggingConfig};
pub use error::InfrastructureError;
pub use http::{HttpClientConfig, ReqwestTransport, X_REQUEST_ID, error_detail};
pub use telemetry::init_logging;

/// Build an [`ApiClient`] over the HTTP transport
pub fn create_api_client(config: &AppConfig) -> Result<ApiClient, InfrastructureError> {
    let transport = ReqwestTransport::new(HttpClientConfig::from(&config.api))?;
    Ok(ApiClient::builder(Arc::new(transport))
        .cache_config(QueryCacheConfig::from(&config.cache))
        .build())
}
