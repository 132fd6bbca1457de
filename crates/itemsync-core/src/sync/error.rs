use thiserror::Error;

use crate::api::NetworkError;
use crate::cache::StorageError;

/// First failure of a refresh, passed through with its message unchanged.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
