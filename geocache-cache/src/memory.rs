//! In-memory TTL store for geocoding payloads.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use geocache_core::error::Result;
use geocache_core::traits::CacheStore;
use geocache_core::types::{CacheEntry, Clock, SystemClock};

/// Cache configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries; `None` means unbounded
    pub max_entries: Option<usize>,
}

/// In-memory cache store.
///
/// Thread-safe. Expired rows stay in the map until [`purge_expired`] runs or
/// capacity pressure evicts them, but they are never returned by `get`.
///
/// [`purge_expired`]: MemoryCacheStore::purge_expired
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl MemoryCacheStore {
    /// Creates an unbounded store on the system clock.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a store with custom configuration on the system clock.
    pub fn with_config(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a store with an explicit time source.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let capacity = config.max_entries.unwrap_or(0);
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity)),
            config,
            clock,
        }
    }

    /// Physically removes expired rows and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| e.is_live_at(now));
        let purged = before - entries.len();
        debug!(purged, "Purged expired cache entries");
        purged
    }

    /// Returns the number of stored rows, expired or not.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| !e.is_live_at(now)).count();
        CacheStats {
            total_entries: entries.len(),
            expired_entries: expired,
            live_entries: entries.len().saturating_sub(expired),
        }
    }

    fn make_room(&self, entries: &mut HashMap<String, CacheEntry>, incoming: &str) {
        let Some(max) = self.config.max_entries else {
            return;
        };
        if entries.len() < max || entries.contains_key(incoming) {
            return;
        }

        let now = self.clock.now();
        entries.retain(|_, e| e.is_live_at(now));

        if entries.len() >= max {
            if let Some(soonest) = entries
                .iter()
                .min_by_key(|(_, e)| e.expires_at)
                .map(|(k, _)| k.clone())
            {
                trace!(evicted = %soonest, "Evicting entry closest to expiry");
                entries.remove(&soonest);
            }
        }
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = self.clock.now();
        let entries = self.entries.read();
        Ok(entries
            .get(key)
            .filter(|e| e.is_live_at(now))
            .map(|e| e.value.clone()))
    }

    async fn save(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let entry = CacheEntry::new(key, value, self.clock.now(), ttl)?;
        let mut entries = self.entries.write();
        self.make_room(&mut entries, key);
        entries.insert(key.to_string(), entry);
        Ok(())
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Serialize)]
pub struct CacheStats {
    /// Total rows (including expired)
    pub total_entries: usize,
    /// Rows past their expiry but not yet purged
    pub expired_entries: usize,
    /// Rows that are logical hits
    pub live_entries: usize,
}
