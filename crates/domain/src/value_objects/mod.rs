//! Value Objects - Immutable, identity-less domain primitives

mod password;
mod project_id;
mod role;
mod user_id;

pub use password::{Password, PasswordPolicy};
pub use project_id::ProjectId;
pub use role::Role;
pub use user_id::UserId;
