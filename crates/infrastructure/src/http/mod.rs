//! HTTP transport for the backend API
//!
//! Outgoing requests carry an `X-Request-Id` header so backend logs can be
//! correlated with client logs.

mod reqwest_transport;

pub use reqwest_transport::{HttpClientConfig, ReqwestTransport, X_REQUEST_ID, error_detail};
