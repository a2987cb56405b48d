//! # Academy Core
//!
//! Local-first record store for a single institution's academic operations.
//!
//! This crate provides:
//! - The record model (staff, schedule slots, lesson logs, homework)
//! - [`RecordStore`], which applies every mutation under its invariants and
//!   persists the whole state through an [`academy_storage::DocumentStore`]
//! - The snapshot codec used for remote backups, which never carries the
//!   sync credential
//! - Read-side reports, share-message formatting and image import
//!
//! ## Key Invariants
//!
//! - At most one schedule slot per `(day, class, period)`
//! - An inactive staff member always carries `year_ended`, an active one never
//! - Deleting staff vacates their schedule slots but leaves history untouched
//! - A failed save never corrupts the previously persisted document

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
pub mod image;
mod model;
pub mod reports;
mod schedule;
pub mod share;
mod snapshot;
mod store;

pub use config::Config;
pub use error::{CoreError, CoreResult, RecordKind};
pub use model::{
    Day, Gender, HomeworkRecord, LessonRecord, NewHomework, NewLesson, NewStaff, RecordId,
    ScheduleSlot, SchoolClass, SlotEntry, SlotField, SlotKey, StaffMember, SyncCredential,
};
pub use schedule::Schedule;
pub use snapshot::{Snapshot, SnapshotCodec, StoreState};
pub use store::{LoadWarning, RecordStore};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
