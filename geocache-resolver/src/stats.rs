//! Resolver counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) requests: AtomicU64,
    pub(crate) cache_hits: AtomicU64,
    pub(crate) cache_misses: AtomicU64,
    pub(crate) upstream_calls: AtomicU64,
    pub(crate) upstream_failures: AtomicU64,
    pub(crate) store_failures: AtomicU64,
}

impl Counters {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ResolverStats {
        ResolverStats {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            upstream_calls: self.upstream_calls.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time resolver statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResolverStats {
    /// Valid requests handled
    pub requests: u64,
    /// Requests answered from the cache
    pub cache_hits: u64,
    /// Requests that missed the cache
    pub cache_misses: u64,
    /// Calls made to the geocoding provider
    pub upstream_calls: u64,
    /// Provider calls that failed
    pub upstream_failures: u64,
    /// Cache reads or writes that failed
    pub store_failures: u64,
}
