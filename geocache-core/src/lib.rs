//! # Geocache Core
//!
//! Core types, errors, and traits shared by every geocache crate.
//!
//! - **Types**: cache entries, address validation, clocks
//! - **Errors**: the service-wide error taxonomy
//! - **Constants**: cache lifetime, table name, environment keys
//! - **Traits**: the `CacheStore` and `GeocodeProvider` seams
//!
//! ## Example
//!
//! ```rust
//! use geocache_core::{validate_address, GeocacheError};
//!
//! assert!(validate_address(Some("1600 Amphitheatre Parkway")).is_ok());
//! assert!(matches!(validate_address(Some("   ")), Err(GeocacheError::Validation(_))));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{GeocacheError, Result};
pub use traits::*;
pub use types::*;
