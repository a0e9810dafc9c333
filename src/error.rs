use thiserror::Error;

pub type Result<T> = std::result::Result<T, TierError>;

#[derive(Debug, Error)]
pub enum TierError {
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),
}
