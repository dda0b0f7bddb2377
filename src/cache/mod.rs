// Result cache for as-of queries.
//
// Keyed by the exact (vehicle, normalized timestamp) pair, so only literally
// identical queries share an entry. Only successful resolutions are stored;
// not-found and error outcomes always go back to the store. Two concurrent
// misses for one key may both resolve and both write — last write wins, no
// single-flight coalescing.

use crate::resolver::VehicleStateView;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Composite cache key: vehicle ID plus the query instant in canonical
/// epoch-millisecond form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub vehicle_id: String,
    pub as_of_ms: i64,
}

impl CacheKey {
    pub fn new(vehicle_id: impl Into<String>, as_of_ms: i64) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            as_of_ms,
        }
    }
}

struct CacheEntry {
    view: VehicleStateView,
    expires_at: Instant,
}

/// TTL-bounded memoization of successful resolutions.
///
/// Entries expire a fixed duration after insertion and are never refreshed in
/// place — a re-query after expiry re-resolves and replaces the entry. Expiry
/// is evaluated lazily on `get`, with [`run_cache_sweep`] reclaiming entries
/// that are never looked up again.
pub struct QueryCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Look up a cached view. An expired entry is evicted and reported as a
    /// miss — it is never returned as a hit.
    pub fn get(&self, key: &CacheKey) -> Option<VehicleStateView> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                return Some(entry.view.clone());
            }
        }

        // Missing or expired; drop the stale entry on the way out
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        None
    }

    /// Insert a freshly resolved view, valid for one TTL from now.
    pub fn put(&self, key: CacheKey, view: VehicleStateView) {
        let expires_at = Instant::now() + self.ttl;
        self.entries.insert(key, CacheEntry { view, expires_at });
    }

    /// Evict all expired entries. Returns the number evicted.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Background task to periodically evict expired cache entries
pub async fn run_cache_sweep(cache: Arc<QueryCache>, interval_seconds: u64) {
    let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(interval_seconds));

    loop {
        interval.tick().await;
        let evicted = cache.purge_expired();
        tracing::debug!(evicted, remaining = cache.len(), "Cache sweep complete");
    }
}
