use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::models::Item;

use super::record::{ItemRecord, TableFile, SCHEMA_VERSION};
use super::subscription::{ItemSubscription, Snapshot};
use super::{ItemStream, LocalStore, StorageError};

/// Default number of commits buffered per subscriber before it starts
/// skipping to newer snapshots.
pub const DEFAULT_UPDATE_BUFFER: usize = 64;

/// Durable item table with a live query.
///
/// Clone is cheap; clones share the same table and subscribers.
#[derive(Clone)]
pub struct ItemStore {
    inner: Arc<Inner>,
}

struct Inner {
    /// `None` for an in-memory store.
    path: Option<PathBuf>,
    table: RwLock<Table>,
    updates: broadcast::Sender<Snapshot>,
    /// Serializes commits, including their disk writes.
    writer: Mutex<()>,
}

struct Table {
    snapshot: Snapshot,
    saved_at: Option<DateTime<Utc>>,
}

impl ItemStore {
    /// Open the table stored at `path`, creating its directory if needed.
    /// A missing file is an empty table.
    pub async fn open(path: impl Into<PathBuf>, update_buffer: usize) -> Result<Self, StorageError> {
        let path = path.into();
        let (items, saved_at, path) =
            tokio::task::spawn_blocking(move || Self::load(&path).map(|(items, saved_at)| (items, saved_at, path)))
                .await??;

        info!(path = %path.display(), count = items.len(), "Opened item store");
        Ok(Self::with_table(Some(path), items, saved_at, update_buffer))
    }

    /// A store with no backing file.
    pub fn in_memory(update_buffer: usize) -> Self {
        Self::with_table(None, Vec::new(), None, update_buffer)
    }

    fn with_table(
        path: Option<PathBuf>,
        items: Vec<Item>,
        saved_at: Option<DateTime<Utc>>,
        update_buffer: usize,
    ) -> Self {
        let (updates, _) = broadcast::channel(update_buffer.max(1));
        Self {
            inner: Arc::new(Inner {
                path,
                table: RwLock::new(Table {
                    snapshot: Arc::new(items),
                    saved_at,
                }),
                updates,
                writer: Mutex::new(()),
            }),
        }
    }

    fn load(path: &Path) -> Result<(Vec<Item>, Option<DateTime<Utc>>), StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = match std::fs::read(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No item table yet, starting empty");
                return Ok((Vec::new(), None));
            }
            Err(e) => return Err(e.into()),
        };

        let file: TableFile = serde_json::from_slice(&contents)?;
        if file.version != SCHEMA_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: file.version,
                expected: SCHEMA_VERSION,
            });
        }

        let items = keyed(file.items.into_iter().map(Item::from));
        Ok((items, Some(file.saved_at)))
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// Current committed contents.
    pub fn snapshot(&self) -> Vec<Item> {
        self.inner.read_table().snapshot.as_ref().clone()
    }

    /// When the current contents were committed. `None` if never written.
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.inner.read_table().saved_at
    }

    /// Typed live view; [`LocalStore::observe_all`] boxes this.
    pub fn subscribe(&self) -> ItemSubscription {
        let table = self.inner.read_table();
        ItemSubscription::new(Arc::clone(&table.snapshot), self.inner.updates.subscribe())
    }
}

impl Inner {
    fn read_table(&self) -> std::sync::RwLockReadGuard<'_, Table> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist, swap and broadcast as one unit. Runs on the blocking pool.
    fn commit(&self, items: Vec<Item>) -> Result<(), StorageError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let items = keyed(items);
        let saved_at = Utc::now();
        if let Some(ref path) = self.path {
            persist(path, &items, saved_at)?;
        }

        let count = items.len();
        let snapshot = Arc::new(items);
        {
            let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
            table.snapshot = Arc::clone(&snapshot);
            table.saved_at = Some(saved_at);
            // Sent under the table lock so a concurrent subscribe sees either
            // the old snapshot plus this update, or the new snapshot alone.
            let receivers = self.updates.send(snapshot).unwrap_or(0);
            debug!(count, receivers, "Committed item table");
        }
        Ok(())
    }
}

/// Enforce one record per id; the last duplicate wins. Returns ascending id
/// order, the table's enumeration order.
fn keyed(items: impl IntoIterator<Item = Item>) -> Vec<Item> {
    items
        .into_iter()
        .map(|item| (item.id, item))
        .collect::<BTreeMap<_, _>>()
        .into_values()
        .collect()
}

/// Write to a sibling temp file, fsync, then rename over the table file.
fn persist(path: &Path, items: &[Item], saved_at: DateTime<Utc>) -> Result<(), StorageError> {
    let file = TableFile {
        version: SCHEMA_VERSION,
        saved_at,
        items: items.iter().map(ItemRecord::from).collect(),
    };
    let contents = serde_json::to_vec_pretty(&file)?;

    let tmp_path = path.with_extension("json.tmp");
    {
        let mut tmp = std::fs::File::create(&tmp_path)?;
        tmp.write_all(&contents)?;
        tmp.sync_all()?;
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[async_trait]
impl LocalStore for ItemStore {
    fn observe_all(&self) -> ItemStream {
        self.subscribe().boxed()
    }

    async fn replace_all(&self, items: Vec<Item>) -> Result<(), StorageError> {
        let inner = Arc::clone(&self.inner);
        // Detached from the caller: once started, a commit finishes whole
        // even if the awaiting future is dropped.
        tokio::task::spawn_blocking(move || inner.commit(items)).await?
    }
}

// ============================================================================
// Tests
// ============================================================================
