//! DTOs for API requests and responses.

use serde::{Deserialize, Serialize};

use geocache_resolver::ResolverStats;

/// Query string of the geocode endpoint.
#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    /// Free-text address, URL-decoded
    pub address: Option<String>,
}

/// Response for health check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" while the process serves requests
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// Response for resolver statistics.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Cache backend in use
    pub backend: &'static str,
    /// Resolver counters
    #[serde(flatten)]
    pub resolver: ResolverStats,
}
