//! Admin user management endpoints
//!
//! Listing entries provide the `AdminUsers` type tag, detail entries provide
//! `AdminUsers:{id}`. Writes that can move a user between listing pages or
//! filters (create, update, role change, delete) invalidate the type tag.

use domain::{PrincipalKind, UserListQuery};
use serde_json::Value;

use super::descriptor::{BodySpec, EndpointDescriptor, TagSpec};
use super::names::{
    CREATE_USER, DELETE_USER, GET_USER, LIST_USERS, UPDATE_USER, UPDATE_USER_PASSWORD,
    UPDATE_USER_ROLE,
};
use super::tag::{ADMIN_USERS, Tag, id_from_args};
use crate::error::ApplicationError;
use crate::ports::HttpMethod;

/// Query pairs in `q`, `role`, `page`, `limit` order, skipping empty values
fn list_query(args: &Value) -> Result<Vec<(String, String)>, ApplicationError> {
    if args.is_null() {
        return Ok(Vec::new());
    }
    let query: UserListQuery = serde_json::from_value(args.clone())
        .map_err(|e| ApplicationError::InvalidArguments(format!("listUsers: {e}")))?;
    Ok(query.to_query_pairs())
}

fn user_tag(args: &Value, _: Option<&Value>) -> Vec<Tag> {
    id_from_args(args, "id")
        .map(|id| vec![Tag::item(ADMIN_USERS, id)])
        .unwrap_or_default()
}

fn user_and_list_tags(args: &Value, result: Option<&Value>) -> Vec<Tag> {
    let mut tags = user_tag(args, result);
    tags.push(Tag::list(ADMIN_USERS));
    tags
}

pub fn slice() -> Vec<EndpointDescriptor> {
    let list = || TagSpec::Static(vec![Tag::list(ADMIN_USERS)]);

    vec![
        EndpointDescriptor::query(LIST_USERS, HttpMethod::Get, "/admin/users")
            .with_query(list_query)
            .unwrap_data()
            .scoped_to(PrincipalKind::Admin)
            .provides(list()),
        EndpointDescriptor::query(GET_USER, HttpMethod::Get, "/admin/users/{id}")
            .unwrap_data()
            .scoped_to(PrincipalKind::Admin)
            .provides(TagSpec::Dynamic(user_tag)),
        EndpointDescriptor::mutation(CREATE_USER, HttpMethod::Post, "/admin/users")
            .with_body(BodySpec::Args)
            .unwrap_data()
            .invalidates(list()),
        EndpointDescriptor::mutation(UPDATE_USER, HttpMethod::Put, "/admin/users/{id}")
            .with_body(BodySpec::Field("data"))
            .unwrap_data()
            .invalidates(TagSpec::Dynamic(user_and_list_tags)),
        EndpointDescriptor::mutation(UPDATE_USER_ROLE, HttpMethod::Patch, "/admin/users/{id}/role")
            .with_body(BodySpec::Fields(&["role"]))
            .unwrap_data()
            .invalidates(TagSpec::Dynamic(user_and_list_tags)),
        EndpointDescriptor::mutation(
            UPDATE_USER_PASSWORD,
            HttpMethod::Patch,
            "/admin/users/{id}/password",
        )
        .with_body(BodySpec::Fields(&["password"]))
        .invalidates(TagSpec::Dynamic(user_tag)),
        EndpointDescriptor::mutation(DELETE_USER, HttpMethod::Delete, "/admin/users/{id}")
            .invalidates(list()),
    ]
}
