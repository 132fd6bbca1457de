use async_trait::async_trait;
use itemsync_core::config::ENDPOINT_ENV;
use itemsync_core::{Item, NetworkError, RemoteSource};

/// Stand-in remote when no endpoint is configured. Every refresh fails, so
/// the cache stays as it is.
pub struct MissingEndpoint;

#[async_trait]
impl RemoteSource for MissingEndpoint {
    async fn fetch_all(&self) -> Result<Vec<Item>, NetworkError> {
        Err(NetworkError::InvalidUrl(format!(
            "no endpoint configured (set {} or \"endpoint\" in the config file)",
            ENDPOINT_ENV
        )))
    }
}
