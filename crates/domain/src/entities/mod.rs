//! Domain entities - Records with identity returned by the backend

mod admin_user;
mod principal;
mod project;
mod user_list;

pub use admin_user::AdminUser;
pub use principal::{Principal, PrincipalKind};
pub use project::{Project, Scene, StorySegment};
pub use user_list::UserListPage;
