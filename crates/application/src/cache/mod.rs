//! Query result cache with tag-based invalidation

mod key;
mod query_cache;

pub use key::CacheKey;
pub use query_cache::{
    CacheStats, CommitHook, FetchPolicy, PendingFetch, QueryCache, QueryCacheConfig,
    QuerySnapshot, QueryStatus, QuerySubscription, Settled,
};
