//! In-memory query cache
//!
//! One entry per [`CacheKey`]. An entry tracks the latest request started for
//! its key through a generation number; a settling request writes its result
//! only while its generation is still current, so the last-initiated request
//! wins. Concurrent identical queries share one in-flight future.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

use super::key::CacheKey;
use crate::endpoints::Tag;
use crate::error::ApplicationError;

type FetchFuture = BoxFuture<'static, Result<Value, ApplicationError>>;

/// Runs after a result was written to its entry, outside the cache lock
pub type CommitHook = Box<dyn FnOnce(Result<&Value, &ApplicationError>) + Send>;

/// Lifecycle of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Uninitialized,
    Pending,
    Fulfilled,
    Rejected,
}

/// How a query uses existing entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Serve fresh data, join in-flight requests, fetch otherwise
    #[default]
    CacheFirst,
    /// Always start a new request, superseding any in flight
    NetworkOnly,
}

/// Cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCacheConfig {
    /// How long an entry without subscribers survives [`QueryCache::collect_unused`]
    pub keep_unused_for: Duration,
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self {
            keep_unused_for: Duration::from_secs(60),
        }
    }
}

/// Outcome of a request together with the tags its result provides
#[derive(Debug)]
pub struct Settled {
    pub result: Result<Value, ApplicationError>,
    pub provided_tags: Vec<Tag>,
}

/// A request about to be started for a cache entry
pub struct PendingFetch {
    future: BoxFuture<'static, Settled>,
    on_commit: Option<CommitHook>,
    expected_tags: Vec<Tag>,
}

impl PendingFetch {
    pub fn new(future: BoxFuture<'static, Settled>) -> Self {
        Self {
            future,
            on_commit: None,
            expected_tags: Vec::new(),
        }
    }

    /// Tags the result is known to provide before it arrives
    ///
    /// Invalidating one of them while the request is in flight detaches it.
    #[must_use]
    pub fn expecting(mut self, tags: Vec<Tag>) -> Self {
        self.expected_tags = tags;
        self
    }

    /// Run `hook` once the result has been written to the entry
    ///
    /// Superseded or discarded results never reach the hook.
    #[must_use]
    pub fn on_commit(mut self, hook: CommitHook) -> Self {
        self.on_commit = Some(hook);
        self
    }
}

impl std::fmt::Debug for PendingFetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingFetch")
            .field("on_commit", &self.on_commit.is_some())
            .field("expected_tags", &self.expected_tags)
            .finish_non_exhaustive()
    }
}

/// Point-in-time view of an entry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuerySnapshot {
    pub status: QueryStatus,
    pub data: Option<Value>,
    pub error: Option<ApplicationError>,
    pub stale: bool,
    pub provided_tags: Vec<Tag>,
    pub subscribers: usize,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Queries served from a fulfilled or rejected entry
    pub hits: u64,
    /// Queries that started a request
    pub misses: u64,
    /// Queries that joined an in-flight request
    pub joined: u64,
    /// Current number of entries
    pub entries: usize,
}

struct Entry {
    status: QueryStatus,
    data: Option<Value>,
    error: Option<ApplicationError>,
    provided_tags: Vec<Tag>,
    /// Tags expected from the request in flight
    pending_tags: Vec<Tag>,
    stale: bool,
    generation: u64,
    in_flight: Option<WeakShared<FetchFuture>>,
    subscribers: usize,
    last_used: Instant,
}

impl Entry {
    fn new(now: Instant) -> Self {
        Self {
            status: QueryStatus::Uninitialized,
            data: None,
            error: None,
            provided_tags: Vec::new(),
            pending_tags: Vec::new(),
            stale: false,
            generation: 0,
            in_flight: None,
            subscribers: 0,
            last_used: now,
        }
    }

    fn live_request(&self) -> Option<Shared<FetchFuture>> {
        self.in_flight.as_ref().and_then(WeakShared::upgrade)
    }

    /// Status reflecting the last result written, ignoring any request
    fn settled_status(&self) -> QueryStatus {
        if self.error.is_some() {
            QueryStatus::Rejected
        } else if self.data.is_some() {
            QueryStatus::Fulfilled
        } else {
            QueryStatus::Uninitialized
        }
    }

    fn matches_any(&self, tags: &[Tag]) -> bool {
        let hit = |provided: &[Tag]| {
            tags.iter()
                .any(|tag| provided.iter().any(|p| tag.invalidates(p)))
        };
        hit(&self.provided_tags) || (self.in_flight.is_some() && hit(&self.pending_tags))
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, Entry>,
    next_generation: u64,
}

impl CacheState {
    fn bump_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    joined: AtomicU64,
}

enum Lookup {
    Ready(Result<Value, ApplicationError>),
    Await(Shared<FetchFuture>),
}

/// Shared cache of query results
///
/// Cloning yields another handle to the same entries.
#[derive(Clone, Default)]
pub struct QueryCache {
    state: Arc<Mutex<CacheState>>,
    counters: Arc<Counters>,
    config: QueryCacheConfig,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("QueryCache")
            .field("entries", &stats.entries)
            .field("hits", &stats.hits)
            .field("misses", &stats.misses)
            .field("joined", &stats.joined)
            .field("config", &self.config)
            .finish()
    }
}

impl QueryCache {
    pub fn new(config: QueryCacheConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub const fn config(&self) -> &QueryCacheConfig {
        &self.config
    }

    /// Resolve a query through its entry
    ///
    /// `start` is only called when a new request is needed.
    pub async fn run<F>(
        &self,
        key: CacheKey,
        policy: FetchPolicy,
        start: F,
    ) -> Result<Value, ApplicationError>
    where
        F: FnOnce() -> PendingFetch,
    {
        match self.lookup(key, policy, start) {
            Lookup::Ready(result) => result,
            Lookup::Await(request) => request.await,
        }
    }

    fn lookup<F>(&self, key: CacheKey, policy: FetchPolicy, start: F) -> Lookup
    where
        F: FnOnce() -> PendingFetch,
    {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let now = Instant::now();
        let entry = state
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(now));
        entry.last_used = now;

        if policy == FetchPolicy::CacheFirst {
            if let Some(request) = entry.live_request() {
                self.counters.joined.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Joining in-flight request");
                return Lookup::Await(request);
            }
            if !entry.stale {
                match entry.status {
                    QueryStatus::Fulfilled => {
                        self.counters.hits.fetch_add(1, Ordering::Relaxed);
                        debug!(key = %key, "Cache hit");
                        return Lookup::Ready(Ok(entry.data.clone().unwrap_or(Value::Null)));
                    },
                    QueryStatus::Rejected => {
                        if let Some(error) = entry.error.clone() {
                            self.counters.hits.fetch_add(1, Ordering::Relaxed);
                            debug!(key = %key, "Returning retained error");
                            return Lookup::Ready(Err(error));
                        }
                    },
                    QueryStatus::Uninitialized | QueryStatus::Pending => {},
                }
            }
        } else if entry.in_flight.is_some() {
            debug!(key = %key, "Superseding in-flight request");
        }

        let generation = state.bump_generation();
        let entry = state
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(now));

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, generation, "Starting request");

        let PendingFetch {
            future,
            on_commit,
            expected_tags,
        } = start();
        let cache = self.clone();
        let request: FetchFuture = async move {
            let settled = future.await;
            cache.commit(&key, generation, settled, on_commit)
        }
        .boxed();
        let request = request.shared();

        entry.status = QueryStatus::Pending;
        entry.generation = generation;
        entry.in_flight = request.downgrade();
        entry.pending_tags = expected_tags;
        Lookup::Await(request)
    }

    fn commit(
        &self,
        key: &CacheKey,
        generation: u64,
        settled: Settled,
        on_commit: Option<CommitHook>,
    ) -> Result<Value, ApplicationError> {
        let Settled {
            result,
            provided_tags,
        } = settled;

        let applied = {
            let mut state = self.state.lock();
            match state.entries.get_mut(key) {
                Some(entry) if entry.generation == generation => {
                    entry.in_flight = None;
                    entry.pending_tags.clear();
                    entry.stale = false;
                    entry.provided_tags = provided_tags;
                    match &result {
                        Ok(data) => {
                            entry.status = QueryStatus::Fulfilled;
                            entry.data = Some(data.clone());
                            entry.error = None;
                        },
                        Err(error) => {
                            entry.status = QueryStatus::Rejected;
                            entry.error = Some(error.clone());
                        },
                    }
                    true
                },
                _ => false,
            }
        };

        if applied {
            debug!(key = %key, generation, ok = result.is_ok(), "Committed result");
            if let Some(hook) = on_commit {
                hook(result.as_ref());
            }
        } else {
            debug!(key = %key, generation, "Dropping superseded result");
        }
        result
    }

    /// Mark every entry providing a matching tag as stale
    ///
    /// An entry matches on the tags of its last result, or while a request
    /// is in flight, on the tags that request was started with. A matching
    /// request is detached: its result will not be written, the entry falls
    /// back to its last settled status, and the next query starts over.
    /// Returns the number of entries affected.
    pub fn invalidate_tags(&self, tags: &[Tag]) -> usize {
        if tags.is_empty() {
            return 0;
        }

        let mut guard = self.state.lock();
        let state = &mut *guard;
        let mut affected = 0;

        for (key, entry) in &mut state.entries {
            if !entry.matches_any(tags) {
                continue;
            }
            entry.stale = true;
            if entry.in_flight.take().is_some() {
                state.next_generation += 1;
                entry.generation = state.next_generation;
                entry.pending_tags.clear();
                entry.status = entry.settled_status();
            }
            affected += 1;
            debug!(key = %key, "Invalidated entry");
        }
        affected
    }

    pub fn snapshot(&self, key: &CacheKey) -> QuerySnapshot {
        let state = self.state.lock();
        state
            .entries
            .get(key)
            .map(|entry| QuerySnapshot {
                status: entry.status,
                data: entry.data.clone(),
                error: entry.error.clone(),
                stale: entry.stale,
                provided_tags: entry.provided_tags.clone(),
                subscribers: entry.subscribers,
            })
            .unwrap_or_default()
    }

    /// Keep an entry alive while the returned guard exists
    pub fn subscribe(&self, key: CacheKey) -> QuerySubscription {
        {
            let mut state = self.state.lock();
            let now = Instant::now();
            let entry = state
                .entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(now));
            entry.subscribers += 1;
            entry.last_used = now;
        }
        QuerySubscription {
            cache: self.clone(),
            key,
        }
    }

    fn unsubscribe(&self, key: &CacheKey) {
        let mut state = self.state.lock();
        if let Some(entry) = state.entries.get_mut(key) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
            entry.last_used = Instant::now();
        }
    }

    /// Remove entries nobody uses
    ///
    /// An entry goes once it has no subscribers, no live request and was
    /// last used at least `keep_unused_for` ago.
    pub fn collect_unused(&self) -> usize {
        let now = Instant::now();
        let keep_for = self.config.keep_unused_for;
        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|key, entry| {
            let keep = entry.subscribers > 0
                || entry.live_request().is_some()
                || now.duration_since(entry.last_used) < keep_for;
            if !keep {
                debug!(key = %key, "Removing unused entry");
            }
            keep
        });
        before - state.entries.len()
    }

    /// Drop one entry; a pending result for it is discarded
    pub fn evict(&self, key: &CacheKey) -> bool {
        self.state.lock().entries.remove(key).is_some()
    }

    /// Drop every entry; pending results are discarded
    pub fn reset(&self) {
        let mut state = self.state.lock();
        let dropped = state.entries.len();
        state.entries.clear();
        debug!(dropped, "Cache reset");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            joined: self.counters.joined.load(Ordering::Relaxed),
            entries: self.state.lock().entries.len(),
        }
    }
}

/// Subscription guard returned by [`QueryCache::subscribe`]
pub struct QuerySubscription {
    cache: QueryCache,
    key: CacheKey,
}

impl QuerySubscription {
    pub const fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Current state of the subscribed entry
    pub fn snapshot(&self) -> QuerySnapshot {
        self.cache.snapshot(&self.key)
    }
}

impl std::fmt::Debug for QuerySubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySubscription")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl Drop for QuerySubscription {
    fn drop(&mut self) {
        self.cache.unsubscribe(&self.key);
    }
}
