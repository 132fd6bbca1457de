use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt item table: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Unsupported item table version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
