use thiserror::Error;

/// Failures reported by a key-value backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Quota exceeded writing {key}: {needed} bytes needed, {available} available")]
    QuotaExceeded {
        key: String,
        needed: u64,
        available: u64,
    },

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage is full: could not save project {id} ({bytes} bytes) even after clearing other projects")]
    CapacityExhausted { id: String, bytes: u64 },

    #[error("Invalid import: {0}")]
    InvalidImport(String),

    #[error("Export failed on every target: {0}")]
    ExportFailed(String),

    #[error("Compression error: {0}")]
    Compression(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type StoreResult<T> = Result<T, StoreError>;
