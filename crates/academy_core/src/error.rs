//! Error types for academy core.

use std::fmt;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The collection a missing record was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A staff member.
    Staff,
    /// A schedule slot.
    ScheduleSlot,
    /// A lesson record.
    Lesson,
    /// A homework record.
    Homework,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Staff => "staff member",
            RecordKind::ScheduleSlot => "schedule slot",
            RecordKind::Lesson => "lesson",
            RecordKind::Homework => "homework",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in academy core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] academy_storage::StorageError),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error outside the storage backend (e.g. image import).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The mutation target does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Collection that was searched.
        kind: RecordKind,
        /// The id that was not found.
        id: String,
    },

    /// A snapshot document is missing collections or cannot be decoded.
    #[error("malformed snapshot: {message}")]
    MalformedSnapshot {
        /// Description of the problem.
        message: String,
    },

    /// No schedule slot exists to log a lesson against.
    #[error("no subject scheduled for {class} period {period} on {date}")]
    NoScheduledSlot {
        /// Class section.
        class: String,
        /// Period number.
        period: u8,
        /// Requested date.
        date: String,
    },
}

impl CoreError {
    /// Creates a not-found error.
    pub fn not_found(kind: RecordKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Creates a malformed snapshot error.
    pub fn malformed_snapshot(message: impl Into<String>) -> Self {
        Self::MalformedSnapshot {
            message: message.into(),
        }
    }

    /// Returns true if this error reports a missing mutation target.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}
