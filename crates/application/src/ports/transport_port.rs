//! Transport port definition
//!
//! The single request sender every endpoint goes through. Implementations
//! attach cookie credentials so the backend's session cookies round-trip,
//! and never retry: a failed call surfaces immediately.

use std::fmt;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde_json::Value;

use crate::error::ApplicationError;

/// HTTP method of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether cookies are attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialsMode {
    /// Send and store cookies (session cookie round-trip)
    #[default]
    Include,
    /// Anonymous request
    Omit,
}

/// A fully resolved request, relative to the transport's base URL
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    /// Path relative to the base URL, starting with `/`
    pub path: String,
    /// Query-string pairs in order
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
    pub credentials: CredentialsMode,
}

impl TransportRequest {
    /// Create a request without query or body
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            credentials: CredentialsMode::default(),
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub const fn with_credentials(mut self, credentials: CredentialsMode) -> Self {
        self.credentials = credentials;
        self
    }
}

/// Port for issuing HTTP calls to the backend
///
/// Returns the decoded JSON body (`Value::Null` for empty bodies), or
/// `Network` / `HttpStatus` / `Decode` errors.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransportPort: Send + Sync {
    /// Send one request
    async fn send(&self, request: TransportRequest) -> Result<Value, ApplicationError>;

    /// Base URL all request paths are resolved against
    fn base_url(&self) -> String;
}
