//! Session slices
//!
//! Each slice holds the principal of one session kind and notifies
//! subscribers on change. Slices are written only by applying
//! [`SessionUpdate`]s produced from endpoint outcomes.

use std::sync::Arc;

use domain::{Principal, PrincipalKind};
use tokio::sync::watch;
use tracing::info;

/// State change derived from an endpoint outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    Set(PrincipalKind, Principal),
    Clear(PrincipalKind),
}

impl SessionUpdate {
    pub const fn kind(&self) -> PrincipalKind {
        match self {
            Self::Set(kind, _) | Self::Clear(kind) => *kind,
        }
    }
}

/// Observable principal of one session kind
#[derive(Debug, Clone)]
pub struct SessionSlice {
    kind: PrincipalKind,
    sender: Arc<watch::Sender<Option<Principal>>>,
}

impl SessionSlice {
    fn new(kind: PrincipalKind) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            kind,
            sender: Arc::new(sender),
        }
    }

    pub const fn kind(&self) -> PrincipalKind {
        self.kind
    }

    /// Logged-in principal, if any
    pub fn current(&self) -> Option<Principal> {
        self.sender.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.sender.borrow().is_some()
    }

    /// Receiver notified on every change
    pub fn subscribe(&self) -> watch::Receiver<Option<Principal>> {
        self.sender.subscribe()
    }

    pub(crate) fn set(&self, principal: Principal) {
        info!(session = %self.kind, user_id = %principal.id, "Session established");
        self.sender.send_replace(Some(principal));
    }

    pub(crate) fn clear(&self) {
        let previous = self.sender.send_replace(None);
        if let Some(principal) = previous {
            info!(session = %self.kind, user_id = %principal.id, "Session cleared");
        }
    }
}

/// Independent user and admin sessions
#[derive(Debug, Clone)]
pub struct SessionStore {
    user: SessionSlice,
    admin: SessionSlice,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            user: SessionSlice::new(PrincipalKind::User),
            admin: SessionSlice::new(PrincipalKind::Admin),
        }
    }

    pub const fn user(&self) -> &SessionSlice {
        &self.user
    }

    pub const fn admin(&self) -> &SessionSlice {
        &self.admin
    }

    pub const fn slice(&self, kind: PrincipalKind) -> &SessionSlice {
        match kind {
            PrincipalKind::User => &self.user,
            PrincipalKind::Admin => &self.admin,
        }
    }

    pub(crate) fn apply(&self, updates: Vec<SessionUpdate>) {
        for update in updates {
            match update {
                SessionUpdate::Set(kind, principal) => self.slice(kind).set(principal),
                SessionUpdate::Clear(kind) => self.slice(kind).clear(),
            }
        }
    }

    pub(crate) fn clear_all(&self) {
        self.user.clear();
        self.admin.clear();
    }
}
