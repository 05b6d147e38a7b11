//! Admin user management

use domain::{
    AdminUser, CreateUserRequest, Role, UpdatePasswordRequest, UpdateUserRequest,
    UpdateUserRoleRequest, UserId, UserListPage, UserListQuery, validate_request,
};
use serde_json::json;
use tracing::{debug, instrument};

use super::{from_data, message_of, to_args};
use crate::client::ApiClient;
use crate::endpoints::names;
use crate::error::ApplicationError;

/// Account listing and editing for the admin panel
#[derive(Debug, Clone, Copy)]
pub struct AdminUsersService<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminUsersService<'a> {
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// One page of accounts, cached per filter set
    #[instrument(skip(self))]
    pub async fn list_users(&self, query: &UserListQuery) -> Result<UserListPage, ApplicationError> {
        from_data(self.client.query(names::LIST_USERS, to_args(query)?).await?)
    }

    pub async fn refetch_users(
        &self,
        query: &UserListQuery,
    ) -> Result<UserListPage, ApplicationError> {
        from_data(self.client.refetch(names::LIST_USERS, to_args(query)?).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: UserId) -> Result<AdminUser, ApplicationError> {
        from_data(self.client.query(names::GET_USER, json!(id)).await?)
    }

    pub async fn refetch_user(&self, id: UserId) -> Result<AdminUser, ApplicationError> {
        from_data(self.client.refetch(names::GET_USER, json!(id)).await?)
    }

    #[instrument(skip(self, request), fields(email = %request.email, role = %request.role))]
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<AdminUser, ApplicationError> {
        validate_request(request)?;
        from_data(
            self.client
                .mutate(names::CREATE_USER, to_args(request)?)
                .await?,
        )
    }

    /// Apply a partial update
    #[instrument(skip(self, request))]
    pub async fn update_user(
        &self,
        id: UserId,
        request: &UpdateUserRequest,
    ) -> Result<AdminUser, ApplicationError> {
        validate_request(request)?;
        if request.changes_role() {
            debug!(user_id = %id, "Update changes role");
        }
        let args = json!({"id": id, "data": to_args(request)?});
        from_data(self.client.mutate(names::UPDATE_USER, args).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_user_role(&self, id: UserId, role: Role) -> Result<AdminUser, ApplicationError> {
        let mut args = to_args(&UpdateUserRoleRequest { role })?;
        args["id"] = json!(id);
        from_data(self.client.mutate(names::UPDATE_USER_ROLE, args).await?)
    }

    /// Switch between `admin` and `user`
    pub async fn toggle_user_role(&self, user: &AdminUser) -> Result<AdminUser, ApplicationError> {
        self.update_user_role(user.id, user.role.toggled()).await
    }

    #[instrument(skip(self, request))]
    pub async fn update_user_password(
        &self,
        id: UserId,
        request: &UpdatePasswordRequest,
    ) -> Result<Option<String>, ApplicationError> {
        validate_request(request)?;
        let mut args = to_args(request)?;
        args["id"] = json!(id);
        let body = self.client.mutate(names::UPDATE_USER_PASSWORD, args).await?;
        Ok(message_of(&body))
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> Result<Option<String>, ApplicationError> {
        let body = self.client.mutate(names::DELETE_USER, json!(id)).await?;
        Ok(message_of(&body).or_else(|| body.as_str().map(str::to_owned)))
    }
}
