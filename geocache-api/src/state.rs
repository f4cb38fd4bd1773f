//! App state: cache backend, resolver, config.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use geocache_cache::MemoryCacheStore;
#[cfg(feature = "turso")]
use geocache_cache::LibsqlCacheStore;
use geocache_core::constants::{API_KEY_ENV, DEFAULT_GOOGLE_BASE_URL};
use geocache_core::error::{GeocacheError, Result};
use geocache_core::traits::CacheStore;
use geocache_google::{GoogleConfig, GoogleGeocodeClient};
use geocache_resolver::{GeocodeResolver, ResolverConfig};

const TURSO_URL_ENV: &str = "TURSO_DATABASE_URL";
const TURSO_TOKEN_ENV: &str = "TURSO_AUTH_TOKEN";

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Server configuration.
#[derive(Clone)]
pub struct ApiConfig {
    /// Google Maps API key (`GOOGLE_MAPS_API_KEY`)
    pub google_api_key: String,
    /// Provider host, overridable for tests
    pub google_base_url: String,
    /// Turso database URL; `None` selects the in-memory store
    pub turso_url: Option<String>,
    /// Turso auth token
    pub turso_auth_token: Option<String>,
    /// Resolver behavior
    pub resolver: ResolverConfig,
}

impl ApiConfig {
    /// Creates a config with an in-memory cache and the public Google endpoint.
    pub fn new(google_api_key: impl Into<String>) -> Self {
        Self {
            google_api_key: google_api_key.into(),
            google_base_url: DEFAULT_GOOGLE_BASE_URL.into(),
            turso_url: None,
            turso_auth_token: None,
            resolver: ResolverConfig::default(),
        }
    }

    /// Loads `.env` if present, then reads the process environment.
    ///
    /// A missing `GOOGLE_MAPS_API_KEY` is fatal.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| non_empty(&lookup, key);

        let google_api_key = var(API_KEY_ENV)
            .ok_or_else(|| GeocacheError::Config(format!("{} is not set", API_KEY_ENV)))?;

        let mut resolver = ResolverConfig::default();
        if let Some(policy) = var("CACHE_WRITE_FAILURE") {
            resolver.write_failure = policy.parse()?;
        }
        resolver.coalesce_inflight = var("COALESCE_INFLIGHT")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(false);

        Ok(Self {
            google_api_key,
            google_base_url: var("GEOCODE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GOOGLE_BASE_URL.into()),
            turso_url: var(TURSO_URL_ENV),
            turso_auth_token: var(TURSO_TOKEN_ENV),
            resolver,
        })
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("google_api_key", &"<redacted>")
            .field("google_base_url", &self.google_base_url)
            .field("turso_url", &self.turso_url)
            .field("turso_auth_token", &self.turso_auth_token.as_ref().map(|_| "<redacted>"))
            .field("resolver", &self.resolver)
            .finish()
    }
}

/// The concrete cache store behind the resolver.
///
/// Kept alongside the resolver so maintenance work (purging) can reach
/// backend-specific operations.
#[derive(Clone)]
pub enum CacheBackend {
    /// Process-local map
    Memory(Arc<MemoryCacheStore>),
    /// Turso / libSQL table
    #[cfg(feature = "turso")]
    Turso(Arc<LibsqlCacheStore>),
}

impl CacheBackend {
    /// Connects the backend described by `config`.
    pub async fn connect(config: &ApiConfig) -> Result<Self> {
        match &config.turso_url {
            None => Ok(CacheBackend::Memory(Arc::new(MemoryCacheStore::new()))),
            Some(url) => Self::connect_turso(url, config.turso_auth_token.as_deref()).await,
        }
    }

    /// Connects the persistent store named by `TURSO_DATABASE_URL`.
    ///
    /// Needs no provider credentials. The in-memory store only exists inside
    /// a running server, so a missing URL is a `Config` error.
    pub async fn persistent_from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::persistent_from_lookup(|key| std::env::var(key).ok()).await
    }

    pub(crate) async fn persistent_from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let url = non_empty(&lookup, TURSO_URL_ENV).ok_or_else(|| {
            GeocacheError::Config(format!(
                "{} is not set; the in-memory store cannot be reached from outside the server",
                TURSO_URL_ENV
            ))
        })?;
        Self::connect_turso(&url, non_empty(&lookup, TURSO_TOKEN_ENV).as_deref()).await
    }

    #[cfg(feature = "turso")]
    async fn connect_turso(url: &str, auth_token: Option<&str>) -> Result<Self> {
        let store = LibsqlCacheStore::connect_remote(url, auth_token.unwrap_or_default()).await?;
        Ok(CacheBackend::Turso(Arc::new(store)))
    }

    #[cfg(not(feature = "turso"))]
    async fn connect_turso(_url: &str, _auth_token: Option<&str>) -> Result<Self> {
        Err(GeocacheError::Config(format!(
            "{} is set but the turso feature is disabled",
            TURSO_URL_ENV
        )))
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            CacheBackend::Memory(_) => "memory",
            #[cfg(feature = "turso")]
            CacheBackend::Turso(_) => "turso",
        }
    }

    /// The backend as a trait object for the resolver.
    pub fn store(&self) -> Arc<dyn CacheStore> {
        match self {
            CacheBackend::Memory(store) => store.clone(),
            #[cfg(feature = "turso")]
            CacheBackend::Turso(store) => store.clone(),
        }
    }

    /// Physically deletes expired rows and returns how many were removed.
    pub async fn purge_expired(&self) -> Result<u64> {
        match self {
            CacheBackend::Memory(store) => Ok(store.purge_expired() as u64),
            #[cfg(feature = "turso")]
            CacheBackend::Turso(store) => store.purge_expired().await,
        }
    }
}

/// Long-lived handles shared by every request.
pub struct AppState {
    /// Configuration the state was built from
    pub config: ApiConfig,
    /// Concrete cache store
    pub backend: CacheBackend,
    /// Cache-aside resolver over `backend` and the Google client
    pub resolver: GeocodeResolver,
}

impl AppState {
    /// Builds the cache backend, the provider client, and the resolver once.
    pub async fn new(config: ApiConfig) -> Result<Self> {
        let backend = CacheBackend::connect(&config).await?;
        let provider = GoogleGeocodeClient::with_config(
            GoogleConfig::new(config.google_api_key.clone())
                .with_base_url(config.google_base_url.clone()),
        )?;
        let resolver = GeocodeResolver::new(
            backend.store(),
            Arc::new(provider),
            config.resolver.clone(),
        );

        info!(
            backend = backend.name(),
            write_failure = ?config.resolver.write_failure,
            coalesce = config.resolver.coalesce_inflight,
            "Initialized geocoding resolver"
        );

        Ok(Self {
            config,
            backend,
            resolver,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use geocache_resolver::WriteFailurePolicy;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = ApiConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, GeocacheError::Config(ref m) if m.contains(API_KEY_ENV)));
    }

    #[test]
    fn test_blank_api_key_is_fatal() {
        let err = ApiConfig::from_lookup(lookup_from(&[(API_KEY_ENV, "  ")])).unwrap_err();
        assert!(matches!(err, GeocacheError::Config(_)));
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup_from(&[(API_KEY_ENV, "k")])).unwrap();
        assert_eq!(config.google_api_key, "k");
        assert_eq!(config.google_base_url, DEFAULT_GOOGLE_BASE_URL);
        assert!(config.turso_url.is_none());
        assert_eq!(config.resolver.write_failure, WriteFailurePolicy::Propagate);
        assert!(!config.resolver.coalesce_inflight);
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            (API_KEY_ENV, "k"),
            ("GEOCODE_BASE_URL", "http://localhost:9999"),
            ("CACHE_WRITE_FAILURE", "continue"),
            ("COALESCE_INFLIGHT", "true"),
            ("TURSO_DATABASE_URL", "libsql://geo.turso.io"),
        ]))
        .unwrap();

        assert_eq!(config.google_base_url, "http://localhost:9999");
        assert_eq!(config.resolver.write_failure, WriteFailurePolicy::LogAndContinue);
        assert!(config.resolver.coalesce_inflight);
        assert_eq!(config.turso_url.as_deref(), Some("libsql://geo.turso.io"));
    }

    #[test]
    fn test_bad_policy_is_config_error() {
        let err = ApiConfig::from_lookup(lookup_from(&[
            (API_KEY_ENV, "k"),
            ("CACHE_WRITE_FAILURE", "sometimes"),
        ]))
        .unwrap_err();
        assert!(matches!(err, GeocacheError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = ApiConfig::new("super-secret");
        config.turso_auth_token = Some("also-secret".into());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("also-secret"));
    }

    #[tokio::test]
    async fn test_persistent_backend_needs_only_turso_url() {
        let err = CacheBackend::persistent_from_lookup(lookup_from(&[(API_KEY_ENV, "k")]))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, GeocacheError::Config(ref m) if m.contains(TURSO_URL_ENV)));

        let err = CacheBackend::persistent_from_lookup(lookup_from(&[(TURSO_URL_ENV, "  ")]))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, GeocacheError::Config(ref m) if !m.contains(API_KEY_ENV)));
    }

    #[tokio::test]
    async fn test_state_defaults_to_memory_backend() {
        let state = AppState::new(ApiConfig::new("k")).await.unwrap();
        assert_eq!(state.backend.name(), "memory");
        assert_eq!(state.backend.purge_expired().await.unwrap(), 0);
    }
}
