use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors from the durable cache mirror.
pub enum StorageError {
    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be encoded or decoded.
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The snapshot on disk belongs to a different namespace.
    #[error("snapshot at {path} has namespace '{found}', expected '{expected}'")]
    NamespaceMismatch {
        /// Snapshot location.
        path: PathBuf,
        /// Namespace recorded in the file.
        found: String,
        /// Namespace this mirror owns.
        expected: &'static str,
    },
}

/// Convenience result type for mirror operations.
pub type StorageResult<T> = Result<T, StorageError>;
