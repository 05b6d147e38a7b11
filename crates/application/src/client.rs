//! API client
//!
//! Entry point of the application layer. Resolves endpoint names through the
//! registry, routes queries through the cache, sends mutations directly and
//! applies their session effects and tag invalidations.

use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::cache::{
    CacheKey, FetchPolicy, PendingFetch, QueryCache, QueryCacheConfig, QuerySnapshot,
    QuerySubscription, Settled,
};
use crate::endpoints::{EndpointDescriptor, EndpointKind, EndpointRegistry, SessionEffect, Tag};
use crate::error::ApplicationError;
use crate::ports::{TransportPort, TransportRequest};
use crate::services::{AdminAuthService, AdminUsersService, AuthService, ProjectService};
use crate::session::{BootstrapOutcome, SessionBootstrap, SessionStore};

struct ClientInner {
    transport: Arc<dyn TransportPort>,
    registry: Arc<EndpointRegistry>,
    cache: QueryCache,
    sessions: SessionStore,
    bootstrap: SessionBootstrap,
}

/// Shared handle to the backend
///
/// Cheap to clone; clones share the cache and sessions.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.transport.base_url())
            .field("endpoints", &self.inner.registry.len())
            .field("cache", &self.inner.cache)
            .field("bootstrapped", &self.inner.bootstrap.is_complete())
            .finish()
    }
}

/// Builder for [`ApiClient`]
pub struct ApiClientBuilder {
    transport: Arc<dyn TransportPort>,
    registry: Option<EndpointRegistry>,
    cache_config: QueryCacheConfig,
}

impl fmt::Debug for ApiClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClientBuilder")
            .field("base_url", &self.transport.base_url())
            .field("custom_registry", &self.registry.is_some())
            .field("cache_config", &self.cache_config)
            .finish()
    }
}

impl ApiClientBuilder {
    /// Use a custom registry instead of [`EndpointRegistry::standard`]
    #[must_use]
    pub fn registry(mut self, registry: EndpointRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub const fn cache_config(mut self, config: QueryCacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    pub fn build(self) -> ApiClient {
        let registry = self.registry.unwrap_or_else(EndpointRegistry::standard);
        ApiClient {
            inner: Arc::new(ClientInner {
                transport: self.transport,
                registry: Arc::new(registry),
                cache: QueryCache::new(self.cache_config),
                sessions: SessionStore::new(),
                bootstrap: SessionBootstrap::new(),
            }),
        }
    }
}

impl ApiClient {
    /// Client over the standard endpoint set
    pub fn new(transport: Arc<dyn TransportPort>) -> Self {
        Self::builder(transport).build()
    }

    pub fn builder(transport: Arc<dyn TransportPort>) -> ApiClientBuilder {
        ApiClientBuilder {
            transport,
            registry: None,
            cache_config: QueryCacheConfig::default(),
        }
    }

    /// Run a query, served from the cache when possible
    #[instrument(skip(self, args))]
    pub async fn query(&self, endpoint: &str, args: Value) -> Result<Value, ApplicationError> {
        self.run_query(endpoint, args, FetchPolicy::CacheFirst).await
    }

    /// Run a query over the network, superseding any request in flight
    #[instrument(skip(self, args))]
    pub async fn refetch(&self, endpoint: &str, args: Value) -> Result<Value, ApplicationError> {
        self.run_query(endpoint, args, FetchPolicy::NetworkOnly).await
    }

    async fn run_query(
        &self,
        endpoint: &str,
        args: Value,
        policy: FetchPolicy,
    ) -> Result<Value, ApplicationError> {
        let descriptor = self.inner.registry.require(endpoint, EndpointKind::Query)?;
        let request = descriptor.build_request(&args)?;
        let key = CacheKey::new(descriptor.name(), &args);

        self.inner
            .cache
            .run(key, policy, || self.start_fetch(descriptor, args, request))
            .await
    }

    fn start_fetch(
        &self,
        descriptor: Arc<EndpointDescriptor>,
        args: Value,
        request: TransportRequest,
    ) -> PendingFetch {
        let transport = Arc::clone(&self.inner.transport);
        let effect = descriptor.session_effect();
        let expected_tags = descriptor.resolve_provided(&args, None);

        let fetch = PendingFetch::new(
            async move {
                let result = match transport.send(request).await {
                    Ok(body) => descriptor.transform().apply(body),
                    Err(e) => Err(e),
                };
                // A rejected entry still depends on its arguments and session
                let provided_tags = descriptor.resolve_provided(&args, result.as_ref().ok());
                Settled {
                    result,
                    provided_tags,
                }
            }
            .boxed(),
        )
        .expecting(expected_tags);

        if effect == SessionEffect::None {
            return fetch;
        }
        let sessions = self.inner.sessions.clone();
        fetch.on_commit(Box::new(
            move |outcome: Result<&Value, &ApplicationError>| {
                sessions.apply(effect.evaluate(outcome));
            },
        ))
    }

    /// Send a mutation
    ///
    /// The endpoint's session effect is applied from the outcome, and every
    /// entry tied to a session it changes is marked stale. On success the
    /// tags it invalidates are marked stale as well.
    #[instrument(skip(self, args))]
    pub async fn mutate(&self, endpoint: &str, args: Value) -> Result<Value, ApplicationError> {
        let descriptor = self
            .inner
            .registry
            .require(endpoint, EndpointKind::Mutation)?;
        let request = descriptor.build_request(&args)?;

        let result = match self.inner.transport.send(request).await {
            Ok(body) => descriptor.transform().apply(body),
            Err(e) => Err(e),
        };

        let updates = descriptor.session_effect().evaluate(result.as_ref());
        let session_tags: Vec<Tag> = updates.iter().map(|u| Tag::session(u.kind())).collect();
        self.inner.sessions.apply(updates);
        if !session_tags.is_empty() {
            let stale = self.inner.cache.invalidate_tags(&session_tags);
            debug!(endpoint, tags = ?session_tags, stale, "Invalidated session entries");
        }

        if let Ok(data) = &result {
            let tags = descriptor.invalidated_tags().resolve(&args, Some(data));
            if !tags.is_empty() {
                let stale = self.inner.cache.invalidate_tags(&tags);
                debug!(endpoint, tags = ?tags, stale, "Invalidated cache entries");
            }
        }
        result
    }

    /// Current cache state of a query without fetching
    pub fn snapshot(&self, endpoint: &str, args: &Value) -> Result<QuerySnapshot, ApplicationError> {
        let descriptor = self.inner.registry.require(endpoint, EndpointKind::Query)?;
        Ok(self
            .inner
            .cache
            .snapshot(&CacheKey::new(descriptor.name(), args)))
    }

    /// Keep a query's entry alive while the guard exists
    pub fn subscribe(
        &self,
        endpoint: &str,
        args: &Value,
    ) -> Result<QuerySubscription, ApplicationError> {
        let descriptor = self.inner.registry.require(endpoint, EndpointKind::Query)?;
        Ok(self
            .inner
            .cache
            .subscribe(CacheKey::new(descriptor.name(), args)))
    }

    /// Restore the session once per client
    pub async fn bootstrap(&self) -> BootstrapOutcome {
        self.inner.bootstrap.run_once(self).await
    }

    /// Whether the startup sequence has finished
    pub fn is_ready(&self) -> bool {
        self.inner.bootstrap.is_complete()
    }

    /// Drop all cached data and both sessions
    pub fn reset(&self) {
        self.inner.cache.reset();
        self.inner.sessions.clear_all();
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.inner.registry
    }

    pub fn base_url(&self) -> String {
        self.inner.transport.base_url()
    }

    pub const fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    pub const fn admin_auth(&self) -> AdminAuthService<'_> {
        AdminAuthService::new(self)
    }

    pub const fn admin_users(&self) -> AdminUsersService<'_> {
        AdminUsersService::new(self)
    }

    pub const fn projects(&self) -> ProjectService<'_> {
        ProjectService::new(self)
    }
}
