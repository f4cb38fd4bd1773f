//! Google Geocoding API client.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use geocache_core::constants::{ADDRESS_PARAM, DEFAULT_GOOGLE_BASE_URL, GEOCODE_JSON_PATH};
use geocache_core::error::{GeocacheError, Result};
use geocache_core::traits::GeocodeProvider;

/// Google client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Maps platform API key
    pub api_key: String,
    /// Scheme and host of the API (overridable for tests)
    pub base_url: String,
}

impl GoogleConfig {
    /// Creates a config for the public Google endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_GOOGLE_BASE_URL.into(),
        }
    }

    /// Points the client at a different host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Client for the Google Geocoding API.
///
/// Holds one pooled `reqwest::Client`; build it once and share it. No request
/// timeout is set here, so the transport default applies.
pub struct GoogleGeocodeClient {
    api_key: String,
    endpoint: Url,
    http_client: reqwest::Client,
}

impl GoogleGeocodeClient {
    /// Creates a client from the given config.
    pub fn with_config(config: GoogleConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GeocacheError::Config("Google Maps API key is empty".into()));
        }

        let base = config.base_url.trim_end_matches('/');
        let endpoint = Url::parse(&format!("{}{}", base, GEOCODE_JSON_PATH)).map_err(|e| {
            GeocacheError::Config(format!("Invalid geocoding base URL '{}': {}", config.base_url, e))
        })?;

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("geocache/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeocacheError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.api_key,
            endpoint,
            http_client,
        })
    }

    /// Creates a client for the public Google endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GoogleConfig::new(api_key))
    }

    pub(crate) fn request_url(&self, address: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair(ADDRESS_PARAM, address)
            .append_pair("key", &self.api_key);
        url
    }

    /// Fetches the raw geocoding response body for `address`.
    #[instrument(skip(self))]
    pub async fn geocode_raw(&self, address: &str) -> Result<String> {
        let response = self
            .http_client
            .get(self.request_url(address))
            .send()
            .await
            .map_err(|e| GeocacheError::upstream_transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Geocoding provider returned an error status");
            return Err(GeocacheError::upstream_status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeocacheError::upstream_transport(e.without_url().to_string()))?;

        debug!(bytes = body.len(), "Fetched geocoding payload");
        Ok(body)
    }
}

#[async_trait]
impl GeocodeProvider for GoogleGeocodeClient {
    async fn resolve(&self, address: &str) -> Result<String> {
        self.geocode_raw(address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAYLOAD: &str = r#"{"results":[{"geometry":{"location":{"lat":37.42,"lng":-122.08}}}],"status":"OK"}"#;

    fn client_for(server: &MockServer) -> GoogleGeocodeClient {
        GoogleGeocodeClient::with_config(GoogleConfig::new("test-key").with_base_url(server.uri()))
            .unwrap()
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = GoogleGeocodeClient::new("  ").err().unwrap();
        assert!(matches!(err, GeocacheError::Config(_)));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = GoogleConfig::new("k").with_base_url("not a url");
        let err = GoogleGeocodeClient::with_config(config).err().unwrap();
        assert!(matches!(err, GeocacheError::Config(_)));
    }

    #[test]
    fn test_request_url_escapes_address() {
        let client = GoogleGeocodeClient::new("k").unwrap();
        let url = client.request_url("Main St & 5th #2");

        assert_eq!(url.path(), "/maps/api/geocode/json");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("address".to_string(), "Main St & 5th #2".to_string()),
                ("key".to_string(), "k".to_string()),
            ]
        );
        assert!(!url.as_str().contains(" & "));
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", GoogleConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }

    #[tokio::test]
    async fn test_success_returns_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/geocode/json"))
            .and(query_param("address", "1600 Amphitheatre Parkway"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAYLOAD))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server)
            .resolve("1600 Amphitheatre Parkway")
            .await
            .unwrap();

        assert_eq!(body, PAYLOAD);
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("REQUEST_DENIED"))
            .mount(&server)
            .await;

        let err = client_for(&server).resolve("Paris").await.unwrap_err();

        assert!(matches!(err, GeocacheError::Upstream { status: Some(403), .. }));
    }

    #[tokio::test]
    async fn test_server_error_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).resolve("Paris").await.unwrap_err();

        assert!(matches!(err, GeocacheError::Upstream { status: Some(503), .. }));
    }

    #[tokio::test]
    async fn test_connection_failure_is_upstream_error() {
        let config = GoogleConfig::new("k").with_base_url("http://127.0.0.1:1");
        let client = GoogleGeocodeClient::with_config(config).unwrap();

        let err = client.resolve("Paris").await.unwrap_err();

        assert!(matches!(err, GeocacheError::Upstream { status: None, .. }));
    }
}
