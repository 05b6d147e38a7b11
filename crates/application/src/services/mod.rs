//! Typed services over the endpoint registry
//!
//! Each service validates its payload, serialises it into endpoint
//! arguments and decodes the endpoint's result into domain types.

mod admin_auth_service;
mod admin_users_service;
mod auth_service;
mod project_service;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use admin_auth_service::AdminAuthService;
pub use admin_users_service::AdminUsersService;
pub use auth_service::AuthService;
pub use project_service::ProjectService;

use crate::error::ApplicationError;

fn to_args<T: Serialize>(value: &T) -> Result<Value, ApplicationError> {
    serde_json::to_value(value).map_err(|e| ApplicationError::InvalidArguments(e.to_string()))
}

fn from_data<T: DeserializeOwned>(data: Value) -> Result<T, ApplicationError> {
    serde_json::from_value(data).map_err(|e| ApplicationError::Decode(e.to_string()))
}

/// The `message` field of an acknowledgement body
fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
}
