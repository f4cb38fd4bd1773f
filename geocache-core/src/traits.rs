//! Common traits for geocache.
//!
//! The orchestrator only ever talks to these two interfaces, so stores and
//! providers can be swapped (or mocked) without touching the cache-aside logic.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Durable key-value store with per-entry expiration.
///
/// Implementations might use:
/// - In-memory storage (for testing/development)
/// - Turso/libSQL (for production)
///
/// Keys are exact address strings. Implementations must not normalize them.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the cached payload if the entry is a logical hit.
    ///
    /// An entry whose `expires_at` is not strictly in the future is a miss,
    /// even if the backing store still holds the row. "Not found" is
    /// `Ok(None)`; errors are reserved for I/O failures.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes or overwrites the entry for `key` with `expires_at = now + ttl`.
    async fn save(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// GEOCODE PROVIDER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Client for a single external geocoding call.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Geocodes `address` and returns the provider's raw response body.
    ///
    /// Any non-success status is reported as `GeocacheError::Upstream`.
    async fn resolve(&self, address: &str) -> Result<String>;
}
