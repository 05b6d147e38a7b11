//! Startup session restore
//!
//! Refreshes the session token, then loads the current user. The second call
//! is only issued after the first has settled, so the backend sees the
//! refreshed cookie when resolving `/auth/me`.

use domain::Principal;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use crate::client::ApiClient;
use crate::endpoints::names;

/// Result of the startup sequence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BootstrapOutcome {
    /// Whether the token refresh call succeeded
    pub token_refreshed: bool,
    /// User restored into the session, if any
    pub user: Option<Principal>,
}

/// Runs the startup sequence at most once
#[derive(Debug, Default)]
pub struct SessionBootstrap {
    outcome: OnceCell<BootstrapOutcome>,
}

impl SessionBootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the sequence unconditionally
    ///
    /// Both calls bypass the cache. Failures are not errors here: a failed
    /// refresh is ignored and a failed user load leaves the session empty.
    #[instrument(skip(client))]
    pub async fn run(client: &ApiClient) -> BootstrapOutcome {
        let token_refreshed = match client.refetch(names::REFRESH_TOKEN, Value::Null).await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Token refresh failed, continuing");
                false
            },
        };

        let user = match client.refetch(names::LOAD_USER, Value::Null).await {
            Ok(data) => serde_json::from_value::<Principal>(data).ok(),
            Err(e) => {
                debug!(error = %e, "No session to restore");
                None
            },
        };

        info!(
            token_refreshed,
            authenticated = user.is_some(),
            "Session bootstrap finished"
        );
        BootstrapOutcome {
            token_refreshed,
            user,
        }
    }

    /// Run the sequence on first call; later calls return the first outcome
    pub async fn run_once(&self, client: &ApiClient) -> BootstrapOutcome {
        self.outcome
            .get_or_init(|| Self::run(client))
            .await
            .clone()
    }

    pub fn is_complete(&self) -> bool {
        self.outcome.initialized()
    }
}
