//! Error types for geocache.
//!
//! A small taxonomy built with `thiserror`. Every variant is `Clone` so a
//! single failure can be handed to several callers awaiting the same fetch.

use thiserror::Error;

/// Result type alias using `GeocacheError`.
pub type Result<T> = std::result::Result<T, GeocacheError>;

/// Main error type for all geocache operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocacheError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CALLER ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The address was missing, empty, or whitespace only.
    #[error("Validation error: {0}")]
    Validation(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // COLLABORATOR ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The geocoding provider did not return a success status.
    ///
    /// Every provider failure lands here. `status` is `None` when no HTTP
    /// response was received at all.
    #[error("Error calling geocoding provider: {reason}")]
    Upstream {
        /// HTTP status returned by the provider, if any.
        status: Option<u16>,
        /// Human-readable cause, for logs only.
        reason: String,
    },

    /// The cache store could not be read or written.
    #[error("Cache store error: {0}")]
    Store(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // STARTUP ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GeocacheError {
    /// Builds an upstream error for a non-success HTTP status.
    pub fn upstream_status(status: u16) -> Self {
        GeocacheError::Upstream {
            status: Some(status),
            reason: format!("HTTP {}", status),
        }
    }

    /// Builds an upstream error for a transport failure.
    pub fn upstream_transport(reason: impl Into<String>) -> Self {
        GeocacheError::Upstream {
            status: None,
            reason: reason.into(),
        }
    }

    /// Returns true if this error was caused by the caller's input.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, GeocacheError::Validation(_))
    }
}
