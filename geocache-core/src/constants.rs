//! Service constants for geocache.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE LIFETIME
// ═══════════════════════════════════════════════════════════════════════════════

/// Number of days a geocoding result stays a logical hit.
pub const CACHE_TTL_DAYS: u64 = 30;

/// Time-to-live applied to every cache write. Not configurable.
pub const CACHE_TTL: Duration = Duration::from_secs(CACHE_TTL_DAYS * 24 * 60 * 60);

// ═══════════════════════════════════════════════════════════════════════════════
// PERSISTENCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Name of the table holding cached provider payloads.
pub const CACHE_TABLE: &str = "GeocodingCache";

// ═══════════════════════════════════════════════════════════════════════════════
// PROVIDER
// ═══════════════════════════════════════════════════════════════════════════════

/// Base URL of the Google Maps platform.
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://maps.googleapis.com";

/// Path of the geocoding endpoint, relative to the base URL.
pub const GEOCODE_JSON_PATH: &str = "/maps/api/geocode/json";

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Environment variable carrying the provider credential. Required at startup.
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

/// Query parameter carrying the free-text address.
pub const ADDRESS_PARAM: &str = "address";

/// Message returned when the address is missing or blank.
pub const MISSING_ADDRESS_MESSAGE: &str = "Missing 'address' query parameter";
