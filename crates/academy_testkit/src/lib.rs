//! # Academy Testkit
//!
//! Test utilities for the academy record store.
//!
//! This crate provides:
//! - Test fixtures: in-memory and temp-dir record stores, record builders
//!   and a small populated scenario
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use academy_testkit::prelude::*;
//!
//! #[test]
//! fn survives_reopen() {
//!     let mut store = TestStore::file();
//!     scenarios::small_academy(&mut store);
//!     let store = store.reopen();
//!     assert_eq!(store.staff().len(), 3);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
