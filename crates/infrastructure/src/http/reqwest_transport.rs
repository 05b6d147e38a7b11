//! `TransportPort` over `reqwest`
//!
//! Session cookies set by the backend are kept in the client's cookie jar
//! and sent back on every credentialed request. Requests with
//! [`CredentialsMode::Omit`] go through a second client without a jar.

use std::time::Duration;

use application::{
    ApplicationError, CredentialsMode, HttpMethod, TransportPort, TransportRequest,
};
use async_trait::async_trait;
use reqwest::{
    Client, Method, StatusCode,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::error::InfrastructureError;

/// Header name for request correlation ID
pub const X_REQUEST_ID: &str = "x-request-id";

/// Settings of the underlying HTTP clients
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Root URL request paths are appended to
    pub base_url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Headers included in all requests
    pub default_headers: HeaderMap,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for HttpClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            connect_timeout: config.connect_timeout(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            default_headers: HeaderMap::new(),
        }
    }
}

impl HttpClientConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header; invalid names or values are ignored
    #[must_use]
    pub fn with_header(
        mut self,
        name: impl TryInto<HeaderName>,
        value: impl TryInto<HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.default_headers.insert(name, value);
        }
        self
    }
}

/// Backend transport with a cookie jar
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    anonymous: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: HttpClientConfig) -> Result<Self, InfrastructureError> {
        let build = |cookies: bool| {
            Client::builder()
                .connect_timeout(config.connect_timeout)
                .timeout(config.timeout)
                .user_agent(&config.user_agent)
                .default_headers(config.default_headers.clone())
                .cookie_store(cookies)
                .build()
        };

        Ok(Self {
            client: build(true)?,
            anonymous: build(false)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn map_send_error(err: &reqwest::Error) -> ApplicationError {
    if err.is_timeout() {
        ApplicationError::Network(format!("request timed out: {err}"))
    } else if err.is_connect() {
        ApplicationError::Network(format!("connection failed: {err}"))
    } else {
        ApplicationError::Network(err.to_string())
    }
}

/// Human-readable failure text of an error response
///
/// Uses the JSON `detail` (a string, or a list of `{msg}` objects joined by
/// `"; "`), then `message`, then the raw body, then the status reason.
pub fn error_detail(body: &str, status: StatusCode) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        match map.get("detail") {
            Some(Value::String(detail)) if !detail.trim().is_empty() => return detail.clone(),
            Some(Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            },
            _ => {},
        }
        if let Some(message) = map.get("message").and_then(Value::as_str)
            && !message.trim().is_empty()
        {
            return message.to_string();
        }
    }

    let text = body.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_string(), str::to_string)
}

#[async_trait]
impl TransportPort for ReqwestTransport {
    #[instrument(
        skip(self, request),
        fields(method = %request.method, path = %request.path, request_id = tracing::field::Empty)
    )]
    async fn send(&self, request: TransportRequest) -> Result<Value, ApplicationError> {
        let request_id = Uuid::new_v4();
        tracing::Span::current().record("request_id", tracing::field::display(request_id));

        let client = match request.credentials {
            CredentialsMode::Include => &self.client,
            CredentialsMode::Omit => &self.anonymous,
        };
        let mut builder = client
            .request(to_method(request.method), self.url(&request.path))
            .header(X_REQUEST_ID, request_id.to_string());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!("Sending request");
        let response = builder.send().await.map_err(|e| map_send_error(&e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| map_send_error(&e))?;

        if !status.is_success() {
            let detail = error_detail(&text, status);
            warn!(status = status.as_u16(), detail = %detail, "Request rejected");
            return Err(ApplicationError::HttpStatus {
                status: status.as_u16(),
                detail,
            });
        }

        debug!(status = status.as_u16(), bytes = text.len(), "Response received");
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ApplicationError::Decode(format!("invalid JSON body: {e}")))
    }

    fn base_url(&self) -> String {
        self.base_url.clone()
    }
}
