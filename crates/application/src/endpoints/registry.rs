//! Endpoint registry
//!
//! Holds every descriptor by name. Slices are injected at startup; later
//! injections either replace existing names or leave them in place.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::descriptor::{EndpointDescriptor, EndpointKind};
use super::{admin_auth, admin_users, auth, projects};
use crate::error::ApplicationError;

/// Conflict policy for [`EndpointRegistry::inject`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InjectMode {
    /// Replace descriptors that are already registered
    #[default]
    OverrideExisting,
    /// Keep the registered descriptor and warn
    KeepExisting,
}

/// Name-indexed set of endpoint descriptors
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    endpoints: BTreeMap<&'static str, Arc<EndpointDescriptor>>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the auth, admin auth, admin users and project slices
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.inject(auth::slice(), InjectMode::OverrideExisting);
        registry.inject(admin_auth::slice(), InjectMode::OverrideExisting);
        registry.inject(admin_users::slice(), InjectMode::OverrideExisting);
        registry.inject(projects::slice(), InjectMode::OverrideExisting);
        registry
    }

    /// Register a batch of descriptors
    ///
    /// Returns the number of descriptors that were written.
    pub fn inject(
        &mut self,
        slice: impl IntoIterator<Item = EndpointDescriptor>,
        mode: InjectMode,
    ) -> usize {
        let mut written = 0;
        for descriptor in slice {
            let name = descriptor.name();
            if self.endpoints.contains_key(name) && mode == InjectMode::KeepExisting {
                warn!(endpoint = name, "Endpoint already registered, keeping existing definition");
                continue;
            }
            debug!(endpoint = name, kind = %descriptor.kind(), "Registered endpoint");
            self.endpoints.insert(name, Arc::new(descriptor));
            written += 1;
        }
        written
    }

    /// Builder-style [`inject`](Self::inject)
    #[must_use]
    pub fn with_slice(
        mut self,
        slice: impl IntoIterator<Item = EndpointDescriptor>,
        mode: InjectMode,
    ) -> Self {
        self.inject(slice, mode);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<EndpointDescriptor>> {
        self.endpoints.get(name).cloned()
    }

    /// Look up a descriptor and check its kind
    pub fn require(
        &self,
        name: &str,
        kind: EndpointKind,
    ) -> Result<Arc<EndpointDescriptor>, ApplicationError> {
        let descriptor = self
            .get(name)
            .ok_or_else(|| ApplicationError::UnknownEndpoint(name.to_string()))?;
        if descriptor.kind() != kind {
            return Err(ApplicationError::WrongEndpointKind {
                name: name.to_string(),
                expected: kind.as_str(),
            });
        }
        Ok(descriptor)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&'static str> {
        self.endpoints.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
