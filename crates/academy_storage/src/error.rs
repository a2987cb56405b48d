//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document key cannot be mapped onto the backend.
    #[error("invalid document key: {key:?}")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },

    /// The write would exceed the backend's capacity.
    #[error("storage quota exceeded: need {needed} bytes, limit {limit}")]
    QuotaExceeded {
        /// Bytes the write would occupy.
        needed: usize,
        /// Capacity of the backend in bytes.
        limit: usize,
    },

    /// Another process holds the storage directory.
    #[error("storage locked: another process has exclusive access")]
    Locked,
}
