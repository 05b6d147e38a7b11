//! Application layer - client data and session synchronisation
//!
//! Declares every backend operation as an [`EndpointDescriptor`], caches query
//! results under tag-based invalidation, and keeps the user and admin sessions
//! in sync with login, logout and the startup bootstrap.
//! The HTTP transport is a port implemented by the infrastructure layer.

pub mod cache;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod ports;
pub mod services;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{
    CacheKey, CacheStats, FetchPolicy, QueryCache, QueryCacheConfig, QuerySnapshot, QueryStatus,
    QuerySubscription,
};
pub use client::{ApiClient, ApiClientBuilder};
pub use endpoints::{
    EndpointDescriptor, EndpointKind, EndpointRegistry, InjectMode, SessionEffect, Tag, names,
};
pub use error::ApplicationError;
pub use ports::{CredentialsMode, HttpMethod, TransportPort, TransportRequest};
pub use services::{AdminAuthService, AdminUsersService, AuthService, ProjectService};
pub use session::{BootstrapOutcome, SessionBootstrap, SessionSlice, SessionStore, SessionUpdate};
