//! User and admin session state

mod bootstrap;
mod store;

pub use bootstrap::{BootstrapOutcome, SessionBootstrap};
pub use store::{SessionSlice, SessionStore, SessionUpdate};
