use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use futures::stream::{BoxStream, Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::warn;

use crate::models::Item;

use super::StorageError;

/// A committed table state shared between the store and its subscribers.
pub(crate) type Snapshot = Arc<Vec<Item>>;

/// Live view of an [`ItemStore`](super::ItemStore).
///
/// Yields the contents at subscribe time, then one snapshot per commit in
/// commit order. A subscriber that falls more than the store's update buffer
/// behind skips the oldest missed snapshots and resumes with the retained
/// ones, so it always converges on the latest commit.
///
/// Dropping the subscription stops delivery.
pub struct ItemSubscription {
    initial: Option<Snapshot>,
    updates: BoxStream<'static, Result<Snapshot, BroadcastStreamRecvError>>,
}

impl ItemSubscription {
    /// `initial` and `receiver` must be taken under the same lock the writer
    /// holds while broadcasting.
    pub(crate) fn new(initial: Snapshot, receiver: broadcast::Receiver<Snapshot>) -> Self {
        Self {
            initial: Some(initial),
            updates: BroadcastStream::new(receiver).boxed(),
        }
    }
}

impl Stream for ItemSubscription {
    type Item = Result<Vec<Item>, StorageError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(initial) = self.initial.take() {
            return Poll::Ready(Some(Ok(initial.as_ref().clone())));
        }

        loop {
            match ready!(self.updates.poll_next_unpin(cx)) {
                Some(Ok(snapshot)) => return Poll::Ready(Some(Ok(snapshot.as_ref().clone()))),
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    warn!(skipped, "Item subscriber lagged, skipping to retained snapshots");
                }
                None => return Poll::Ready(None),
            }
        }
    }
}
