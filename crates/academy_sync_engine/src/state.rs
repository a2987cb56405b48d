//! Sync status state machine.
//!
//! ```text
//! idle ──begin──▶ syncing ──succeed──▶ success ──┐
//!                    │                           ├──(display interval / acknowledge)──▶ idle
//!                    └────fail / drop────▶ error ┘
//! ```
//!
//! `begin` is the only reentrancy guard in the system: while a ticket is
//! outstanding every other `begin` fails with `AlreadySyncing`.

use crate::error::{SyncError, SyncResult};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Reason recorded when a ticket is dropped without finishing.
pub const ABANDONED_REASON: &str = "sync abandoned";

/// The visible sync status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// No sync running and no result on display.
    Idle,
    /// A push or pull is running.
    Syncing,
    /// The last sync completed.
    Success,
    /// The last sync failed with a reason.
    Error(String),
}

impl SyncStatus {
    /// Returns true while a sync is running.
    pub fn is_active(&self) -> bool {
        matches!(self, SyncStatus::Syncing)
    }

    /// Returns true if a new sync may start.
    pub fn can_start_sync(&self) -> bool {
        !self.is_active()
    }

    fn is_settled(&self) -> bool {
        matches!(self, SyncStatus::Success | SyncStatus::Error(_))
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Idle => f.write_str("idle"),
            SyncStatus::Syncing => f.write_str("syncing"),
            SyncStatus::Success => f.write_str("success"),
            SyncStatus::Error(reason) => write!(f, "error: {reason}"),
        }
    }
}

#[derive(Debug)]
struct Inner {
    status: SyncStatus,
    settled_at: Option<Instant>,
}

impl Inner {
    fn settle(&mut self, status: SyncStatus) {
        self.status = status;
        self.settled_at = Some(Instant::now());
    }

    fn decay(&mut self, display_interval: Duration) {
        let expired = self
            .settled_at
            .is_some_and(|at| at.elapsed() >= display_interval);
        if self.status.is_settled() && expired {
            self.status = SyncStatus::Idle;
            self.settled_at = None;
        }
    }
}

/// Tracks the status of push and pull. Clones share state.
#[derive(Debug, Clone)]
pub struct SyncStateMachine {
    inner: Arc<Mutex<Inner>>,
    display_interval: Duration,
}

impl SyncStateMachine {
    /// Creates an idle state machine.
    pub fn new(display_interval: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                status: SyncStatus::Idle,
                settled_at: None,
            })),
            display_interval,
        }
    }

    /// Current status. A `success` or `error` older than the display
    /// interval reads as `idle`.
    pub fn status(&self) -> SyncStatus {
        let mut inner = self.inner.lock();
        inner.decay(self.display_interval);
        inner.status.clone()
    }

    /// Enters `syncing`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySyncing` if a ticket is outstanding.
    pub fn begin(&self) -> SyncResult<SyncTicket> {
        let mut inner = self.inner.lock();
        if inner.status.is_active() {
            return Err(SyncError::AlreadySyncing);
        }
        inner.status = SyncStatus::Syncing;
        inner.settled_at = None;
        Ok(SyncTicket {
            inner: Arc::clone(&self.inner),
            finished: false,
        })
    }

    /// Clears a displayed `success` or `error` immediately.
    pub fn acknowledge(&self) {
        let mut inner = self.inner.lock();
        if inner.status.is_settled() {
            inner.status = SyncStatus::Idle;
            inner.settled_at = None;
        }
    }
}

impl Default for SyncStateMachine {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

/// Proof that a sync is running. Finish it with [`SyncTicket::succeed`] or
/// [`SyncTicket::fail`]; dropping it unfinished records an error.
#[must_use = "dropping the ticket marks the sync as abandoned"]
#[derive(Debug)]
pub struct SyncTicket {
    inner: Arc<Mutex<Inner>>,
    finished: bool,
}

impl SyncTicket {
    /// Moves to `success`.
    pub fn succeed(mut self) {
        self.finish(SyncStatus::Success);
    }

    /// Moves to `error` with a reason.
    pub fn fail(mut self, reason: impl Into<String>) {
        self.finish(SyncStatus::Error(reason.into()));
    }

    fn finish(&mut self, status: SyncStatus) {
        self.finished = true;
        self.inner.lock().settle(status);
    }
}

impl Drop for SyncTicket {
    fn drop(&mut self) {
        if !self.finished {
            self.finish(SyncStatus::Error(ABANDONED_REASON.to_string()));
        }
    }
}
