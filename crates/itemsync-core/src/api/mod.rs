//! Remote source for the item collection.
//!
//! This module provides the `ApiClient` for fetching the complete,
//! authoritative item collection from the backend with a single HTTP GET.
//! There is no pagination and no retry: a fetch either returns the whole
//! collection or fails as a unit.

pub mod client;
pub mod dto;
pub mod error;

use async_trait::async_trait;

use crate::models::Item;

pub use client::ApiClient;
pub use dto::ItemDto;
pub use error::NetworkError;

/// One-shot fetch of the full item collection.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Item>, NetworkError>;
}
