//! Admin account operations

use domain::{LoginRequest, Principal, RegisterAdminRequest, validate_request};
use serde_json::Value;
use tracing::{info, instrument};

use super::{from_data, message_of, to_args};
use crate::client::ApiClient;
use crate::endpoints::names;
use crate::error::ApplicationError;
use crate::session::SessionSlice;

/// Admin registration and login
#[derive(Debug, Clone, Copy)]
pub struct AdminAuthService<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminAuthService<'a> {
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register_admin(
        &self,
        request: &RegisterAdminRequest,
    ) -> Result<Option<String>, ApplicationError> {
        validate_request(request)?;
        let body = self
            .client
            .mutate(names::REGISTER_ADMIN, to_args(request)?)
            .await?;
        Ok(message_of(&body))
    }

    /// Log in and establish the admin session
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login_admin(&self, request: &LoginRequest) -> Result<Principal, ApplicationError> {
        validate_request(request)?;
        let data = self
            .client
            .mutate(names::LOGGED_IN_ADMIN, to_args(request)?)
            .await?;
        let principal: Principal = from_data(data)?;
        info!(user_id = %principal.id, "Admin logged in");
        Ok(principal)
    }

    /// End the admin session; cleared locally whatever the outcome
    #[instrument(skip(self))]
    pub async fn logout_admin(&self) -> Result<(), ApplicationError> {
        self.client.mutate(names::LOGOUT_ADMIN, Value::Null).await?;
        Ok(())
    }

    pub fn session(&self) -> &'a SessionSlice {
        self.client.sessions().admin()
    }
}

#[cfg(test)]
mod tests {
    use domain::Password;
    use serde_json::json;

    use super::*;
    use crate::testing::{ScriptedTransport, principal_json};

    #[tokio::test]
    async fn admin_login_uses_admin_slice() {
        let transport = ScriptedTransport::new();
        transport.reply("/admin/auth/login", Ok(json!({"data": principal_json(9, "Root")})));
        let client = ApiClient::new(transport.clone());

        let admin = client
            .admin_auth()
            .login_admin(&LoginRequest::new("root@example.com", "Admin123"))
            .await
            .unwrap();

        assert_eq!(client.admin_auth().session().current(), Some(admin));
        assert!(!client.sessions().user().is_authenticated());
    }

    #[tokio::test]
    async fn admin_registration_rejects_symbols_before_sending() {
        let transport = ScriptedTransport::new();
        let client = ApiClient::new(transport.clone());

        let request = RegisterAdminRequest {
            full_name: "Root".into(),
            email: "root@example.com".into(),
            password: Password::new("Admin123!"),
        };
        let err = client.admin_auth().register_admin(&request).await.unwrap_err();

        assert!(matches!(err, ApplicationError::Domain(_)));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn admin_logout_failure_still_clears_session() {
        let transport = ScriptedTransport::new();
        transport.reply("/admin/auth/login", Ok(json!({"data": principal_json(9, "Root")})));
        transport.reply(
            "/admin/auth/logout",
            Err(ApplicationError::HttpStatus {
                status: 500,
                detail: String::new(),
            }),
        );
        let client = ApiClient::new(transport.clone());

        client
            .admin_auth()
            .login_admin(&LoginRequest::new("root@example.com", "Admin123"))
            .await
            .unwrap();
        let err = client.admin_auth().logout_admin().await.unwrap_err();

        assert_eq!(err.user_message("Logout failed"), "Logout failed");
        assert!(!client.admin_auth().session().is_authenticated());
    }
}
