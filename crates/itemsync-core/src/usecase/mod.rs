//! Narrow entry points over an [`ItemRepository`].
//!
//! The presentation layer depends on these two capabilities instead of the
//! repository itself: one can only observe, the other can only refresh.
//! Clone is cheap; both share the repository through an `Arc`.

use std::sync::Arc;

use crate::cache::ItemStream;
use crate::sync::{ItemRepository, SyncError};

/// Observe the local item collection.
#[derive(Clone)]
pub struct GetItems {
    repository: Arc<dyn ItemRepository>,
}

impl GetItems {
    pub fn new(repository: Arc<dyn ItemRepository>) -> Self {
        Self { repository }
    }

    pub fn call(&self) -> ItemStream {
        self.repository.observe()
    }
}

/// Refresh the local item collection from the remote source.
#[derive(Clone)]
pub struct RefreshItems {
    repository: Arc<dyn ItemRepository>,
}

impl RefreshItems {
    pub fn new(repository: Arc<dyn ItemRepository>) -> Self {
        Self { repository }
    }

    pub async fn call(&self) -> Result<(), SyncError> {
        self.repository.refresh().await
    }
}
