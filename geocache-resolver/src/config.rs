//! Resolver configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use geocache_core::error::GeocacheError;

/// What to do when the cache write fails after a successful fetch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteFailurePolicy {
    /// Fail the whole call and drop the fetched payload.
    #[default]
    Propagate,
    /// Log a warning and return the fetched payload anyway.
    LogAndContinue,
}

impl FromStr for WriteFailurePolicy {
    type Err = GeocacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" | "fail" => Ok(WriteFailurePolicy::Propagate),
            "continue" | "log_and_continue" | "log-and-continue" => {
                Ok(WriteFailurePolicy::LogAndContinue)
            }
            other => Err(GeocacheError::Config(format!(
                "Unknown cache write failure policy: {}",
                other
            ))),
        }
    }
}

/// Resolver configuration.
///
/// The cache TTL is deliberately absent: every write uses `CACHE_TTL`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Behavior when the cache write fails
    pub write_failure: WriteFailurePolicy,
    /// Share one upstream fetch between concurrent misses on the same key
    pub coalesce_inflight: bool,
}

impl ResolverConfig {
    /// Returns the payload to the caller even when caching it fails.
    pub fn log_write_failures(mut self) -> Self {
        self.write_failure = WriteFailurePolicy::LogAndContinue;
        self
    }

    /// Enables request coalescing for concurrent misses.
    pub fn coalesce(mut self) -> Self {
        self.coalesce_inflight = true;
        self
    }
}
