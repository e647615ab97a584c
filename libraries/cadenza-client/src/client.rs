//! Catalog HTTP client.

use std::sync::Arc;
use std::time::Duration;

use cadenza_core::{CatalogError, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

use crate::error::{decode_envelope, transport_error};
use crate::types::ClientConfig;

/// Client for the catalog REST API.
///
/// Every response is unwrapped from the `{code, message, data}` envelope.
/// The bearer token is attached to each request when present; guests can
/// still list, search and play.
///
/// # Example
///
/// ```ignore
/// use cadenza_client::{ClientConfig, HttpCatalogClient};
/// use cadenza_core::{CatalogClient, MusicStatus};
///
/// let client = HttpCatalogClient::new(ClientConfig::new("http://localhost:8080"))?;
/// client.login("listener", "secret").await?;
///
/// let page = client.list(1, 10, MusicStatus::Approved).await?;
/// println!("{} tracks", page.total);
/// ```
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl HttpCatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;

        if config.timeout.is_zero() {
            return Err(CatalogError::InvalidConfig(
                "Timeout must be greater than zero".into(),
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(10)))
            .user_agent(format!("Cadenza/{} (Listener)", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::InvalidConfig(e.to_string()))?;

        debug!(base_url = %base_url, timeout = ?config.timeout, "Created catalog client");

        Ok(Self {
            http,
            base_url,
            token: Arc::new(RwLock::new(config.token.filter(|t| !t.is_empty()))),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the client has a bearer token.
    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Current bearer token, if any.
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Set the token directly (e.g., from stored credentials).
    pub async fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        *self.token.write().await = Some(token).filter(|t| !t.is_empty());
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.endpoint(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.endpoint(path))
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.endpoint(path))
    }

    pub(crate) async fn store_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    /// Attach credentials, send, and unwrap the envelope.
    pub(crate) async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = match self.token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        let result = decode_envelope(status, &body);
        match &result {
            Err(CatalogError::AuthExpired) => {
                warn!(status = %status, "Catalog rejected credentials");
            }
            Err(e) => debug!(status = %status, error = %e, "Catalog request failed"),
            Ok(_) => {}
        }
        result
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidConfig("URL cannot be empty".into()));
    }

    let url = trimmed.trim_end_matches('/').to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CatalogError::InvalidConfig(
            "URL must start with http:// or https://".into(),
        ));
    }

    let parsed = Url::parse(&url).map_err(|e| CatalogError::InvalidConfig(e.to_string()))?;
    if parsed.host_str().is_none() {
        return Err(CatalogError::InvalidConfig("URL must include a host".into()));
    }

    Ok(url)
}
