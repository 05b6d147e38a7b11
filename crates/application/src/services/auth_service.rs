//! Story author account operations

use domain::{
    ForgotPasswordRequest, LoginRequest, Principal, RegisterUserRequest, ResetPasswordRequest,
    validate_request,
};
use serde_json::Value;
use tracing::{info, instrument};

use super::{from_data, message_of, to_args};
use crate::client::ApiClient;
use crate::endpoints::names;
use crate::error::ApplicationError;
use crate::session::SessionSlice;

/// Registration, login and password recovery for story authors
#[derive(Debug, Clone, Copy)]
pub struct AuthService<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Create an account; returns the backend's acknowledgement
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(
        &self,
        request: &RegisterUserRequest,
    ) -> Result<Option<String>, ApplicationError> {
        validate_request(request)?;
        let body = self
            .client
            .mutate(names::REGISTER_USER, to_args(request)?)
            .await?;
        Ok(message_of(&body))
    }

    /// Log in and establish the user session
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<Principal, ApplicationError> {
        validate_request(request)?;
        let data = self
            .client
            .mutate(names::LOGGED_IN_USER, to_args(request)?)
            .await?;
        let principal: Principal = from_data(data)?;
        info!(user_id = %principal.id, "User logged in");
        Ok(principal)
    }

    /// End the user session
    ///
    /// The local session is cleared even when the call fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApplicationError> {
        self.client.mutate(names::LOGOUT_USER, Value::Null).await?;
        Ok(())
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<Option<String>, ApplicationError> {
        validate_request(request)?;
        let body = self
            .client
            .mutate(names::FORGOT_PASSWORD, to_args(request)?)
            .await?;
        Ok(message_of(&body))
    }

    #[instrument(skip(self, request))]
    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<Option<String>, ApplicationError> {
        validate_request(request)?;
        let body = self
            .client
            .mutate(names::RESET_PASSWORD, to_args(request)?)
            .await?;
        Ok(message_of(&body))
    }

    /// Ask the backend to renew the session cookie
    pub async fn refresh_token(&self) -> Result<Value, ApplicationError> {
        self.client.refetch(names::REFRESH_TOKEN, Value::Null).await
    }

    /// The logged-in user, cached
    pub async fn current_user(&self) -> Result<Principal, ApplicationError> {
        from_data(self.client.query(names::LOAD_USER, Value::Null).await?)
    }

    pub async fn refetch_current_user(&self) -> Result<Principal, ApplicationError> {
        from_data(self.client.refetch(names::LOAD_USER, Value::Null).await?)
    }

    pub fn session(&self) -> &'a SessionSlice {
        self.client.sessions().user()
    }
}
