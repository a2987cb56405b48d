//! Document store trait definition.

use crate::error::{StorageError, StorageResult};

/// A whole-document persistence port.
///
/// Backends hold named byte documents. The record store serializes its
/// complete state into one document and replaces it after every mutation.
///
/// # Invariants
///
/// - `read` returns exactly the bytes of the last successful `write`
/// - A failed `write` leaves the previously written document intact
/// - Keys are validated with [`validate_key`] before use
pub trait DocumentStore: Send + Sync {
    /// Reads the document stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or an I/O error occurs.
    fn read(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid, the backend is full, or an
    /// I/O error occurs. On error the old document is still readable.
    fn write(&mut self, key: &str, data: &[u8]) -> StorageResult<()>;

    /// Removes the document stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or an I/O error occurs.
    fn remove(&mut self, key: &str) -> StorageResult<()>;

    /// Returns true if a document is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or an I/O error occurs.
    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.read(key)?.is_some())
    }
}

/// Checks that a key is usable as a file name on every backend.
///
/// Keys are non-empty and made of ASCII letters, digits, `_`, `-` and `.`,
/// and may not start with a dot.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] otherwise.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
        })
    }
}
