//! Error types for the recorder crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while appending outcome records.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// Failed to open or append to a log file.
    #[error("failed to append to {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Storage error.
    #[error("storage error: {0}")]
    StorageError(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
