//! Cached provider payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GeocacheError, Result};

/// One cached geocoding result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Exact address string supplied by the caller
    pub key: String,
    /// Raw provider payload, never interpreted
    pub value: String,
    /// Absolute expiry: write time + TTL
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates an entry written at `now` that lives for `ttl`.
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        now: DateTime<Utc>,
        ttl: std::time::Duration,
    ) -> Result<Self> {
        Ok(Self {
            key: key.into(),
            value: value.into(),
            expires_at: expiry_after(now, ttl)?,
        })
    }

    /// Returns true if this entry is a logical hit at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Computes `now + ttl`, failing instead of overflowing.
pub fn expiry_after(now: DateTime<Utc>, ttl: std::time::Duration) -> Result<DateTime<Utc>> {
    let ttl = chrono::Duration::from_std(ttl)
        .map_err(|e| GeocacheError::Internal(format!("TTL out of range: {}", e)))?;
    now.checked_add_signed(ttl)
        .ok_or_else(|| GeocacheError::Internal("Expiry timestamp overflow".into()))
}
