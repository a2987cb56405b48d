//! # Academy Storage
//!
//! Persistence port and backends for the academy record store.
//!
//! This crate provides the lowest-level storage abstraction. Backends are
//! **opaque document stores**: they read and replace whole byte documents
//! by key and do not interpret what they hold.
//!
//! ## Design Principles
//!
//! - A write replaces the whole document or nothing
//! - No knowledge of the record format
//! - Must be `Send + Sync` so a store can move between threads
//! - The record store owns all format interpretation
//!
//! ## Available Backends
//!
//! - [`InMemoryStore`] - For testing and ephemeral sessions
//! - [`FileStore`] - For persistent storage using write-then-rename
//!
//! ## Example
//!
//! ```rust
//! use academy_storage::{DocumentStore, InMemoryStore};
//!
//! let mut store = InMemoryStore::new();
//! store.write("state", b"{}").unwrap();
//! assert_eq!(store.read("state").unwrap().as_deref(), Some(&b"{}"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::{validate_key, DocumentStore};
pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
