use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::usecase::{GetItems, RefreshItems};

use super::UiState;

/// State holder for the item list.
///
/// Runs two independent branches on the tokio runtime:
/// - observation: every snapshot from [`GetItems`] replaces `items` and
///   clears `error`; a stream failure sets `error` and ends observation
/// - refresh: [`RefreshItems`] runs with `is_loading` set, then clears it
///   and records any failure in `error`
///
/// Both branches are scoped to the view model. [`close`](Self::close)
/// cancels them and waits, after which the state never changes again.
/// Dropping without `close` cancels without waiting: a branch already past
/// its cancellation check may still publish one last state. Only
/// `close().await` guarantees no mutation after teardown.
pub struct ItemsViewModel {
    state: Arc<watch::Sender<UiState>>,
    refresh_items: RefreshItems,
    cancel: CancellationToken,
    tasks: TaskTracker,
}

impl ItemsViewModel {
    /// Start observing and trigger the initial refresh.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(get_items: GetItems, refresh_items: RefreshItems) -> Self {
        let (state, _) = watch::channel(UiState::default());
        let view_model = Self {
            state: Arc::new(state),
            refresh_items,
            cancel: CancellationToken::new(),
            tasks: TaskTracker::new(),
        };

        view_model.observe_items(&get_items);
        view_model.refresh();
        view_model
    }

    /// Receiver of every state transition.
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    /// Current state.
    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    fn observe_items(&self, get_items: &GetItems) {
        // Subscribe now so the first snapshot reflects the store at creation.
        let mut items = get_items.call();
        let state = Arc::clone(&self.state);
        let cancel = self.cancel.clone();

        self.tasks.spawn(async move {
            loop {
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    next = items.next() => next,
                };
                if cancel.is_cancelled() {
                    break;
                }

                match next {
                    Some(Ok(snapshot)) => {
                        debug!(count = snapshot.len(), "Items updated");
                        state.send_modify(|s| {
                            s.items = snapshot;
                            s.error = None;
                        });
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "Item observation failed");
                        state.send_modify(|s| s.error = Some(e.to_string()));
                        break;
                    }
                    None => {
                        debug!("Item observation ended");
                        break;
                    }
                }
            }
        });
    }

    /// Fire-and-forget refresh. The outcome shows up only in the state.
    ///
    /// Overlapping calls are not deduplicated; callers should not trigger a
    /// refresh while `is_loading` is set.
    pub fn refresh(&self) {
        if self.cancel.is_cancelled() {
            return;
        }

        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let state = Arc::clone(&self.state);
        let cancel = self.cancel.clone();
        let refresh_items = self.refresh_items.clone();

        self.tasks.spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Refresh cancelled");
                    return;
                }
                result = refresh_items.call() => result,
            };
            if cancel.is_cancelled() {
                return;
            }

            match result {
                Ok(()) => state.send_modify(|s| s.is_loading = false),
                Err(e) => {
                    warn!(error = %e, "Refresh failed");
                    state.send_modify(|s| {
                        s.is_loading = false;
                        s.error = Some(e.to_string());
                    });
                }
            }
        });
    }

    /// Cancel observation and any in-flight refresh, and wait for them.
    pub async fn close(self) {
        self.cancel.cancel();
        self.tasks.close();
        self.tasks.wait().await;
        info!("Item view model closed");
    }
}

impl Drop for ItemsViewModel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ============================================================================
// Tests
// ============================================================================
