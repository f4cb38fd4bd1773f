//! Domain types for geocache.
//!
//! - [`CacheEntry`]: a cached provider payload with its absolute expiry
//! - [`validate_address`]: the single input rule applied before any I/O
//! - [`Clock`]: the time source stores use for expiry decisions

mod address;
mod clock;
mod entry;

pub use address::*;
pub use clock::*;
pub use entry::*;
