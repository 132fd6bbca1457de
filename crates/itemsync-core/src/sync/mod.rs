//! Refresh orchestration.
//!
//! `OfflineFirstRepository` bridges the remote source and the local store:
//! `observe` passes the store's live view through untouched, `refresh`
//! fetches the full collection and replaces the store in one commit. A
//! failed refresh leaves the store as it was, so observers keep seeing the
//! previous data.

pub mod error;
pub mod repository;

use async_trait::async_trait;

use crate::cache::ItemStream;

pub use error::SyncError;
pub use repository::OfflineFirstRepository;

/// Observe and refresh the item collection.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Live view of the local items.
    fn observe(&self) -> ItemStream;

    /// Fetch from the remote source and replace the local items.
    async fn refresh(&self) -> Result<(), SyncError>;
}
