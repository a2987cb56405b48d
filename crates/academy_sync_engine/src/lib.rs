//! # Academy Sync Engine
//!
//! Whole-snapshot backup and restore for the academy record store.
//!
//! This crate provides:
//! - [`SyncClient`] with `push` (create or overwrite the remote document)
//!   and `pull` (replace the local store with the remote document)
//! - [`SyncStateMachine`] (idle → syncing → success | error → idle), the
//!   single guard against overlapping syncs
//! - The [`DocumentService`] port, a gist-backed HTTP adapter and an
//!   in-memory service for tests
//!
//! ## Key Invariants
//!
//! - The sync credential never travels inside a snapshot
//! - Pull keeps the local credential
//! - Precondition failures happen before any network call
//! - The local store is untouched unless the remote call fully succeeded
//! - At most one push or pull runs at a time

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod http;
mod state;
mod transport;

pub use client::{PushOutcome, SyncClient, SyncStats};
pub use config::{SyncConfig, DEFAULT_API_BASE};
pub use error::{SyncError, SyncResult};
pub use http::GistService;
pub use state::{SyncStateMachine, SyncStatus, SyncTicket, ABANDONED_REASON};
pub use transport::{DocumentService, MemoryDocumentService};
