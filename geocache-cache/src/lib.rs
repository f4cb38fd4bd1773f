//! # Geocache Cache
//!
//! Cache store backends implementing [`geocache_core::CacheStore`].
//!
//! - **Memory**: process-local map, for development and tests
//! - **Turso**: libSQL table with a per-row expiry (feature `turso`)
//!
//! Both backends decide hit or miss by comparing the stored expiry with
//! their clock, so rows the backend has not purged yet are still misses.
//!
//! ## Example
//!
//! ```rust,ignore
//! use geocache_cache::MemoryCacheStore;
//! use geocache_core::{CacheStore, CACHE_TTL};
//!
//! let store = MemoryCacheStore::new();
//! store.save("Paris", "{\"results\":[]}", CACHE_TTL).await?;
//! assert!(store.get("Paris").await?.is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod memory;
#[cfg(feature = "turso")]
mod turso;

pub use memory::{CacheConfig, CacheStats, MemoryCacheStore};
#[cfg(feature = "turso")]
pub use turso::LibsqlCacheStore;

// Re-export the trait from core
pub use geocache_core::traits::CacheStore;
