//! Declarative endpoint definitions
//!
//! Every backend operation is described once by an [`EndpointDescriptor`]
//! and looked up by name through the [`EndpointRegistry`].

mod admin_auth;
mod admin_users;
mod auth;
mod descriptor;
pub mod names;
mod projects;
mod registry;
mod tag;

pub use descriptor::{
    BodySpec, EndpointDescriptor, EndpointKind, QueryFn, ResponseTransform, SessionEffect, TagFn,
    TagSpec,
};
pub use registry::{EndpointRegistry, InjectMode};
pub use tag::{ADMIN_SESSION, ADMIN_USERS, PROJECTS, Tag, USER_SESSION, id_from_args};
