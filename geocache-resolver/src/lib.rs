//! # Geocache Resolver
//!
//! The cache-aside orchestration between a [`CacheStore`] and a
//! [`GeocodeProvider`]:
//!
//! 1. look the exact address up in the store
//! 2. on a hit, return the cached payload
//! 3. on a miss, fetch from the provider (failures propagate, nothing is cached)
//! 4. save the payload for [`CACHE_TTL`]
//! 5. return the payload
//!
//! ## Example
//!
//! ```rust,ignore
//! use geocache_resolver::{GeocodeResolver, ResolverConfig};
//!
//! let resolver = GeocodeResolver::new(store, provider, ResolverConfig::default());
//! let payload = resolver.resolve(Some("1600 Amphitheatre Parkway")).await?;
//! ```
//!
//! [`CacheStore`]: geocache_core::CacheStore
//! [`GeocodeProvider`]: geocache_core::GeocodeProvider
//! [`CACHE_TTL`]: geocache_core::CACHE_TTL

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod resolver;
mod stats;

pub use config::{ResolverConfig, WriteFailurePolicy};
pub use resolver::GeocodeResolver;
pub use stats::ResolverStats;
