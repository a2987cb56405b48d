//! Error types for the sync engine.

use academy_core::CoreError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during push or pull.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// No token is configured.
    #[error("no sync token configured")]
    MissingCredential,

    /// Pull needs a remote document id and none is known.
    #[error("no remote backup id configured")]
    MissingRemoteId,

    /// The remote document id is stale.
    #[error("remote backup not found: {id}")]
    RemoteNotFound {
        /// The id that was not found.
        id: String,
    },

    /// Network, authorization or server failure.
    #[error("sync failed: {0}")]
    SyncFailed(String),

    /// The fetched document does not decode.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// Another push or pull is still running.
    #[error("a sync is already in progress")]
    AlreadySyncing,
}

impl SyncError {
    /// Creates a sync failure with a reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::SyncFailed(reason.into())
    }

    /// Returns true if the error was raised before any network call.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SyncError::MissingCredential | SyncError::MissingRemoteId | SyncError::AlreadySyncing
        )
    }
}

impl From<CoreError> for SyncError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MalformedSnapshot { message } => SyncError::MalformedSnapshot(message),
            other => SyncError::SyncFailed(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SyncError::failed("request timed out")
        } else {
            SyncError::failed(err.to_string())
        }
    }
}
