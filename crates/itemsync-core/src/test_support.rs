//! Fakes and helpers shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::Semaphore;

use crate::api::{NetworkError, RemoteSource};
use crate::cache::ItemStream;
use crate::models::Item;

pub const STEP_TIMEOUT: Duration = Duration::from_secs(5);

pub fn item(id: i64) -> Item {
    Item::new(id, format!("Item {}", id), "d", "u")
}

/// Next snapshot from a live stream, failing the test on error, end or stall.
pub async fn next_snapshot(stream: &mut ItemStream) -> Vec<Item> {
    tokio::time::timeout(STEP_TIMEOUT, stream.next())
        .await
        .expect("timed out waiting for snapshot")
        .expect("stream ended")
        .expect("stream failed")
}

/// Remote source answering from a script, one entry per call. An exhausted
/// script answers with a server error.
#[derive(Default)]
pub struct ScriptedRemote {
    responses: Mutex<VecDeque<Result<Vec<Item>, String>>>,
    calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, items: Vec<Item>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(items));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.responses.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    /// Hold every answer until a permit is added to `gate`.
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteSource for ScriptedRemote {
    async fn fetch_all(&self) -> Result<Vec<Item>, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ref gate) = self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(items)) => Ok(items),
            Some(Err(message)) => Err(NetworkError::ServerError(message)),
            None => Err(NetworkError::ServerError("script exhausted".to_string())),
        }
    }
}
