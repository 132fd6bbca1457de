//! API client for the items backend.
//!
//! This module provides the `ApiClient` struct, the HTTP implementation of
//! [`RemoteSource`]. It performs exactly one GET per call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use tracing::{debug, warn};

use crate::models::Item;

use super::{ItemDto, NetworkError, RemoteSource};

// ============================================================================
// Constants
// ============================================================================

/// Default path of the items collection, relative to the base URL.
pub const DEFAULT_ITEMS_PATH: &str = "api/articles";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the items endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    items_url: Url,
}

impl ApiClient {
    /// Create a client for `items_path` under `base_url`.
    pub fn new(base_url: &str, items_path: &str, timeout: Duration) -> Result<Self, NetworkError> {
        let items_url = Self::items_url(base_url, items_path)?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NetworkError::Transport)?;

        Ok(Self { client, items_url })
    }

    /// Resolve the full items URL. The base is treated as a directory so a
    /// base of `https://host/v1` keeps its `v1` segment.
    fn items_url(base_url: &str, items_path: &str) -> Result<Url, NetworkError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).map_err(|e| NetworkError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(NetworkError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                base_url,
                base.scheme()
            )));
        }
        base.join(items_path.trim_start_matches('/'))
            .map_err(|e| NetworkError::InvalidUrl(format!("{}: {}", items_path, e)))
    }

    /// The URL `fetch_all` requests.
    pub fn url(&self) -> &Url {
        &self.items_url
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, NetworkError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(NetworkError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl RemoteSource for ApiClient {
    async fn fetch_all(&self) -> Result<Vec<Item>, NetworkError> {
        debug!(url = %self.items_url, "Fetching items");

        let response = self
            .client
            .get(self.items_url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .inspect_err(|e| warn!(error = %e, url = %self.items_url, "Items request failed"))?;

        let response = Self::check_response(response).await?;

        let dtos: Vec<ItemDto> = response.json().await.map_err(|e| {
            if e.is_decode() {
                NetworkError::InvalidResponse(format!("Failed to decode items: {}", e))
            } else {
                // A timeout while reading the body is still a timeout
                NetworkError::from(e)
            }
        })?;

        debug!(count = dtos.len(), "Fetched items");
        Ok(dtos.into_iter().map(Item::from).collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
