//! Client configuration
//!
//! Layered from built-in defaults, an optional `storyreel.toml` and
//! `STORYREEL_*` environment variables, later sources winning. Nested keys
//! use a double underscore: `STORYREEL_API__BASE_URL`.

use std::path::Path;
use std::time::Duration;

use application::QueryCacheConfig;
use config::{Environment, File, FileFormat, FileSourceFile};
use serde::{Deserialize, Serialize};

use crate::error::InfrastructureError;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "STORYREEL";
/// Configuration file looked up in the working directory (any supported extension)
pub const DEFAULT_CONFIG_FILE: &str = "storyreel";

/// Main client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Query cache
    #[serde(default)]
    pub cache: CacheConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("storyreel-client/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Query cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds an unsubscribed entry is kept before collection
    #[serde(default = "default_keep_unused_for_secs")]
    pub keep_unused_for_secs: u64,
}

const fn default_keep_unused_for_secs() -> u64 {
    60
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            keep_unused_for_secs: default_keep_unused_for_secs(),
        }
    }
}

impl From<&CacheConfig> for QueryCacheConfig {
    fn from(config: &CacheConfig) -> Self {
        Self {
            keep_unused_for: Duration::from_secs(config.keep_unused_for_secs),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl AppConfig {
    /// Load from `storyreel.*` (if present) and the environment
    pub fn load() -> Result<Self, InfrastructureError> {
        Self::from_sources(
            File::with_name(DEFAULT_CONFIG_FILE).required(false),
            environment(),
        )
    }

    /// Load from an explicit file, which must exist, and the environment
    pub fn load_from(path: &Path) -> Result<Self, InfrastructureError> {
        Self::from_sources(File::from(path).required(true), environment())
    }

    fn from_sources(
        file: File<FileSourceFile, FileFormat>,
        env: Environment,
    ) -> Result<Self, InfrastructureError> {
        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges the type system cannot express
    pub fn validate(&self) -> Result<(), InfrastructureError> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(InfrastructureError::InvalidConfig(format!(
                "api.base_url must be an http(s) URL, got `{base_url}`"
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(InfrastructureError::InvalidConfig(
                "api.timeout_secs must be positive".to_string(),
            ));
        }
        if self.api.connect_timeout_secs == 0 {
            return Err(InfrastructureError::InvalidConfig(
                "api.connect_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
