//! # Geocache Google
//!
//! [`geocache_core::GeocodeProvider`] backed by the Google Geocoding API.
//!
//! The client returns the provider body verbatim and collapses every
//! non-success status into a single upstream error.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;

pub use client::{GoogleConfig, GoogleGeocodeClient};
