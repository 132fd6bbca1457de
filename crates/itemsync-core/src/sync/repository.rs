use async_trait::async_trait;
use tracing::{info, warn};

use crate::api::RemoteSource;
use crate::cache::{ItemStream, LocalStore};

use super::{ItemRepository, SyncError};

/// Offline-first repository: reads always come from the local store, the
/// remote source only ever feeds it.
///
/// Holds no state of its own. Overlapping `refresh` calls are not
/// deduplicated; the store serializes their commits.
pub struct OfflineFirstRepository<R, S> {
    remote: R,
    store: S,
}

impl<R, S> OfflineFirstRepository<R, S>
where
    R: RemoteSource,
    S: LocalStore,
{
    pub fn new(remote: R, store: S) -> Self {
        Self { remote, store }
    }
}

#[async_trait]
impl<R, S> ItemRepository for OfflineFirstRepository<R, S>
where
    R: RemoteSource,
    S: LocalStore,
{
    fn observe(&self) -> ItemStream {
        self.store.observe_all()
    }

    async fn refresh(&self) -> Result<(), SyncError> {
        info!("Refreshing items");

        let items = self
            .remote
            .fetch_all()
            .await
            .inspect_err(|e| warn!(error = %e, "Fetch failed, keeping cached items"))?;

        let count = items.len();
        self.store
            .replace_all(items)
            .await
            .inspect_err(|e| warn!(error = %e, "Store failed, keeping cached items"))?;

        info!(count, "Refresh complete");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
