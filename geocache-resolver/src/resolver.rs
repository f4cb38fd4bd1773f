//! Cache-aside resolver.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, info, instrument, warn};

use geocache_core::constants::CACHE_TTL;
use geocache_core::error::{GeocacheError, Result};
use geocache_core::traits::{CacheStore, GeocodeProvider};
use geocache_core::types::validate_address;

use crate::config::{ResolverConfig, WriteFailurePolicy};
use crate::stats::{Counters, ResolverStats};

type SharedFetch = Shared<BoxFuture<'static, Result<String>>>;

/// A fetch shared by every caller that missed on the same key.
struct InflightFetch {
    id: u64,
    fetch: SharedFetch,
}

/// Resolves addresses through the cache, falling back to the provider.
///
/// Build one per process and share it; the store and provider clients it
/// holds are reused by every call. The resolver takes no locks of its own
/// unless coalescing is enabled.
pub struct GeocodeResolver {
    store: Arc<dyn CacheStore>,
    provider: Arc<dyn GeocodeProvider>,
    config: ResolverConfig,
    inflight: Arc<DashMap<String, InflightFetch>>,
    next_fetch_id: AtomicU64,
    counters: Arc<Counters>,
}

impl GeocodeResolver {
    /// Creates a resolver over the given store and provider.
    pub fn new(
        store: Arc<dyn CacheStore>,
        provider: Arc<dyn GeocodeProvider>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            store,
            provider,
            config,
            inflight: Arc::new(DashMap::new()),
            next_fetch_id: AtomicU64::new(0),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Resolves an optional address, as received from a query string.
    ///
    /// Missing or blank input fails with `Validation` before any I/O.
    pub async fn resolve(&self, address: Option<&str>) -> Result<String> {
        let address = validate_address(address)?;
        self.resolve_address(address).await
    }

    /// Resolves an address to the provider payload, using the cache when it can.
    #[instrument(skip(self))]
    pub async fn resolve_address(&self, address: &str) -> Result<String> {
        let address = validate_address(Some(address))?;
        Counters::bump(&self.counters.requests);

        let cached = self.store.get(address).await.inspect_err(|e| {
            Counters::bump(&self.counters.store_failures);
            warn!(error = %e, "Cache read failed");
        })?;

        if let Some(payload) = cached {
            Counters::bump(&self.counters.cache_hits);
            info!("Returned from cache");
            return Ok(payload);
        }

        Counters::bump(&self.counters.cache_misses);
        debug!("Cache miss, calling provider");

        if self.config.coalesce_inflight {
            self.fetch_coalesced(address).await
        } else {
            fetch_and_store(
                self.store.clone(),
                self.provider.clone(),
                address.to_string(),
                self.config.write_failure,
                self.counters.clone(),
            )
            .await
        }
    }

    /// Returns a snapshot of the resolver counters.
    pub fn stats(&self) -> ResolverStats {
        self.counters.snapshot()
    }

    /// Number of fetches currently shared between callers.
    pub fn inflight_len(&self) -> usize {
        self.inflight.len()
    }

    /// Joins the in-flight fetch for `address`, starting one if none exists.
    ///
    /// The fetch runs as its own tokio task, so it finishes and leaves the
    /// map even when every caller waiting on it is dropped. The entry is
    /// removed before the result is published; a caller that sees the
    /// result can only start a fresh fetch, never rejoin a finished one.
    async fn fetch_coalesced(&self, address: &str) -> Result<String> {
        let fetch = match self.inflight.entry(address.to_string()) {
            Entry::Occupied(entry) => {
                debug!("Joining in-flight fetch");
                entry.get().fetch.clone()
            }
            Entry::Vacant(entry) => {
                let id = self.next_fetch_id.fetch_add(1, Ordering::Relaxed);
                let key = address.to_string();
                let inflight = self.inflight.clone();
                let work = fetch_and_store(
                    self.store.clone(),
                    self.provider.clone(),
                    key.clone(),
                    self.config.write_failure,
                    self.counters.clone(),
                );

                let task = tokio::spawn(async move {
                    let result = work.await;
                    inflight.remove_if(&key, |_, f| f.id == id);
                    result
                });

                let fetch = task
                    .map(|joined| {
                        joined.unwrap_or_else(|e| {
                            Err(GeocacheError::Internal(format!("Fetch task failed: {}", e)))
                        })
                    })
                    .boxed()
                    .shared();
                entry.insert(InflightFetch {
                    id,
                    fetch: fetch.clone(),
                });
                fetch
            }
        };

        fetch.await
    }
}

/// Steps 3-5 of the cache-aside flow: fetch, save, return.
async fn fetch_and_store(
    store: Arc<dyn CacheStore>,
    provider: Arc<dyn GeocodeProvider>,
    address: String,
    write_failure: WriteFailurePolicy,
    counters: Arc<Counters>,
) -> Result<String> {
    Counters::bump(&counters.upstream_calls);
    let fresh = provider.resolve(&address).await.inspect_err(|e| {
        Counters::bump(&counters.upstream_failures);
        warn!(error = %e, "Provider call failed, nothing cached");
    })?;

    if let Err(e) = store.save(&address, &fresh, CACHE_TTL).await {
        Counters::bump(&counters.store_failures);
        match write_failure {
            WriteFailurePolicy::Propagate => {
                warn!(error = %e, "Cache write failed, discarding fetched payload");
                return Err(e);
            }
            WriteFailurePolicy::LogAndContinue => {
                warn!(error = %e, "Cache write failed, returning uncached payload");
            }
        }
    } else {
        debug!("Cached provider payload");
    }

    Ok(fresh)
}
