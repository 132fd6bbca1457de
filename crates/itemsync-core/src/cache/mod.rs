//! Local caching module for offline data access.
//!
//! This module provides the `ItemStore`, the durable keyed table of items
//! that serves as the single source of truth for the UI. The table is kept
//! as a versioned JSON document on disk and as a shared snapshot in memory.
//!
//! Two operations matter:
//! - `observe_all`: a live stream that yields the current contents and then a
//!   fresh full snapshot after every commit
//! - `replace_all`: atomically swaps the whole table; no intermediate state
//!   is ever visible to observers

pub mod error;
pub mod record;
pub mod store;
pub mod subscription;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::models::Item;

pub use error::StorageError;
pub use record::ItemRecord;
pub use store::ItemStore;
pub use subscription::ItemSubscription;

/// Live sequence of full table snapshots.
///
/// Infinite until dropped. An `Err` item ends the sequence.
pub type ItemStream = BoxStream<'static, Result<Vec<Item>, StorageError>>;

/// Durable keyed storage with a live query.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Subscribe to the table. The first element is the current contents.
    fn observe_all(&self) -> ItemStream;

    /// Replace the whole table with `items` as one commit.
    async fn replace_all(&self, items: Vec<Item>) -> Result<(), StorageError>;
}
