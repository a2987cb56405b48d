//! The record store: canonical in-memory state, persisted on every mutation.

use crate::config::Config;
use crate::error::{CoreError, CoreResult, RecordKind};
use crate::model::{
    Day, HomeworkRecord, LessonRecord, NewHomework, NewLesson, NewStaff, RecordId, ScheduleSlot,
    SchoolClass, SlotEntry, SlotField, SlotKey, StaffMember, SyncCredential,
};
use crate::schedule::Schedule;
use crate::snapshot::{Snapshot, SnapshotCodec, StoreState};
use academy_storage::{DocumentStore, InMemoryStore};
use chrono::{Datelike, Local, NaiveDate};
use std::fmt;
use tracing::{debug, info, warn};

/// Why [`RecordStore::open`] started from an empty dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The backend could not be read.
    Unreadable(String),
    /// The persisted document did not decode.
    Malformed(String),
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::Unreadable(reason) => write!(f, "saved data unreadable: {reason}"),
            LoadWarning::Malformed(reason) => write!(f, "saved data malformed: {reason}"),
        }
    }
}

/// The single source of truth for all records.
///
/// Every mutation is applied to the in-memory state and then the whole
/// state is written through the backend. A failed write does not undo the
/// mutation: the session continues with unsaved changes, the failure is
/// logged and kept in [`RecordStore::last_save_error`], and the next
/// successful save persists everything.
///
/// # Example
///
/// ```rust
/// use academy_core::{Gender, NewStaff, RecordStore};
///
/// let mut store = RecordStore::in_memory();
/// let id = store.add_staff(NewStaff {
///     name: "Amina Yusuf".into(),
///     gender: Gender::Female,
///     phone: "0700000000".into(),
///     email: None,
///     specialization: Some("Mathematics".into()),
///     year_started: 2019,
/// });
/// assert!(store.staff_member(&id).unwrap().is_active);
/// ```
pub struct RecordStore {
    backend: Box<dyn DocumentStore>,
    config: Config,
    codec: SnapshotCodec,
    state: StoreState,
    load_warning: Option<LoadWarning>,
    last_save_error: Option<String>,
}

impl RecordStore {
    /// Opens a store, loading the last persisted state.
    ///
    /// Never fails: a missing document yields an empty dataset, and an
    /// unreadable or malformed one yields an empty dataset plus a
    /// [`LoadWarning`]. The bad document is left in place until the first
    /// successful save replaces it.
    pub fn open(backend: impl DocumentStore + 'static, config: Config) -> Self {
        let codec = SnapshotCodec::new(config.pretty);
        let mut load_warning = None;

        let state = match backend.read(&config.storage_key) {
            Ok(Some(bytes)) => match codec.decode_persisted(&bytes) {
                Ok(state) => state,
                Err(e) => {
                    warn!(key = %config.storage_key, error = %e, "persisted state malformed, starting empty");
                    load_warning = Some(LoadWarning::Malformed(e.to_string()));
                    StoreState::default()
                }
            },
            Ok(None) => StoreState::default(),
            Err(e) => {
                warn!(key = %config.storage_key, error = %e, "persisted state unreadable, starting empty");
                load_warning = Some(LoadWarning::Unreadable(e.to_string()));
                StoreState::default()
            }
        };

        debug!(
            records = state.snapshot.record_count(),
            credential = state.credential.is_some(),
            "record store loaded"
        );

        Self {
            backend: Box::new(backend),
            config,
            codec,
            state,
            load_warning,
            last_save_error: None,
        }
    }

    /// Opens an empty store backed by memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(InMemoryStore::new(), Config::default())
    }

    /// Writes the full current state.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the write fails. The previously
    /// persisted document is left intact by the backend.
    pub fn save(&mut self) -> CoreResult<()> {
        let result = self
            .codec
            .encode_persisted(&self.state)
            .and_then(|bytes| Ok(self.backend.write(&self.config.storage_key, &bytes)?));

        match &result {
            Ok(()) => self.last_save_error = None,
            Err(e) => self.last_save_error = Some(e.to_string()),
        }
        result
    }

    fn commit(&mut self) {
        if let Err(e) = self.save() {
            warn!(error = %e, "failed to persist records, continuing with unsaved changes");
        }
    }

    // ---- read access ------------------------------------------------------

    /// The configuration the store was opened with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Full state, credential included.
    #[must_use]
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Domain data without the credential.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.state.snapshot
    }

    /// Why the store started empty, if loading failed.
    #[must_use]
    pub fn load_warning(&self) -> Option<&LoadWarning> {
        self.load_warning.as_ref()
    }

    /// The last save failure, cleared by the next successful save.
    #[must_use]
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// Signed-in user.
    #[must_use]
    pub fn current_user(&self) -> Option<&str> {
        self.state.snapshot.current_user.as_deref()
    }

    /// All staff members in insertion order.
    #[must_use]
    pub fn staff(&self) -> &[StaffMember] {
        &self.state.snapshot.staff
    }

    /// Staff member by id.
    #[must_use]
    pub fn staff_member(&self, id: &RecordId) -> Option<&StaffMember> {
        self.state.snapshot.staff.iter().find(|member| &member.id == id)
    }

    /// Name of the staff member a weak reference points at, if it still exists.
    #[must_use]
    pub fn staff_name(&self, id: &RecordId) -> Option<&str> {
        if id.is_empty() {
            return None;
        }
        self.staff_member(id).map(|member| member.name.as_str())
    }

    /// The timetable.
    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        &self.state.snapshot.schedule_slots
    }

    /// Slot at a natural key.
    #[must_use]
    pub fn slot_at(&self, key: &SlotKey) -> Option<&ScheduleSlot> {
        self.schedule().get(key)
    }

    /// All lesson records in insertion order.
    #[must_use]
    pub fn lessons(&self) -> &[LessonRecord] {
        &self.state.snapshot.lessons
    }

    /// Returns true if a lesson is already logged for the period.
    ///
    /// The store itself accepts duplicates; callers use this to enforce
    /// one lesson per period at their own boundary.
    #[must_use]
    pub fn has_lesson_for(&self, date: NaiveDate, class: SchoolClass, period: u8) -> bool {
        self.lessons().iter().any(|lesson| {
            lesson.date == date && lesson.class_section == class && lesson.period_number == period
        })
    }

    /// All homework records in insertion order.
    #[must_use]
    pub fn homework(&self) -> &[HomeworkRecord] {
        &self.state.snapshot.homework
    }

    /// The sync credential, if configured.
    #[must_use]
    pub fn credential(&self) -> Option<&SyncCredential> {
        self.state.credential.as_ref()
    }

    /// Returns true if a token is configured.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.state.credential.is_some()
    }

    /// Returns true if both a token and a remote document id are known.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.credential()
            .is_some_and(|credential| credential.remote_id().is_some())
    }

    // ---- session ----------------------------------------------------------

    /// Signs a user in. Blank names are ignored and return false.
    pub fn login(&mut self, username: &str) -> bool {
        let username = username.trim();
        if username.is_empty() {
            return false;
        }
        self.state.snapshot.current_user = Some(username.to_string());
        debug!(user = username, "signed in");
        self.commit();
        true
    }

    /// Signs the current user out.
    pub fn logout(&mut self) {
        self.state.snapshot.current_user = None;
        debug!("signed out");
        self.commit();
    }

    // ---- staff ------------------------------------------------------------

    /// Adds a staff member as active and returns the generated id.
    pub fn add_staff(&mut self, staff: NewStaff) -> RecordId {
        let member = staff.into_member();
        let id = member.id.clone();
        debug!(staff_id = %id, "staff added");
        self.state.snapshot.staff.push(member);
        self.commit();
        id
    }

    /// Replaces a staff member wholesale.
    ///
    /// `year_ended` is brought in line with `is_active`: cleared for an
    /// active member; for an inactive one without a year, the stored year
    /// is kept, or the current year stamped.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no member has the record's id.
    pub fn update_staff(&mut self, mut member: StaffMember) -> CoreResult<()> {
        let slot = self
            .state
            .snapshot
            .staff
            .iter_mut()
            .find(|existing| existing.id == member.id)
            .ok_or_else(|| CoreError::not_found(RecordKind::Staff, member.id.as_str()))?;

        if member.is_active {
            member.year_ended = None;
        } else if member.year_ended.is_none() {
            member.year_ended = Some(slot.year_ended.unwrap_or_else(|| Local::now().year()));
        }
        debug!(staff_id = %member.id, "staff updated");
        *slot = member;
        self.commit();
        Ok(())
    }

    /// Removes a staff member and vacates every schedule slot assigned to
    /// them. Lesson and homework history is left as logged.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no member has the id.
    pub fn delete_staff(&mut self, id: &RecordId) -> CoreResult<StaffMember> {
        let snapshot = &mut self.state.snapshot;
        let index = snapshot
            .staff
            .iter()
            .position(|member| &member.id == id)
            .ok_or_else(|| CoreError::not_found(RecordKind::Staff, id.as_str()))?;

        let removed = snapshot.staff.remove(index);
        let vacated = snapshot.schedule_slots.vacate_staff(id);
        debug!(staff_id = %id, vacated, "staff deleted");
        self.commit();
        Ok(removed)
    }

    /// Flips a staff member's active flag, stamping the current year as
    /// `year_ended` on deactivation. Returns the new active flag.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no member has the id.
    pub fn toggle_staff_status(&mut self, id: &RecordId) -> CoreResult<bool> {
        self.toggle_staff_status_in(id, Local::now().year())
    }

    /// Like [`RecordStore::toggle_staff_status`] with an explicit year.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no member has the id.
    pub fn toggle_staff_status_in(&mut self, id: &RecordId, year: i32) -> CoreResult<bool> {
        let member = self
            .state
            .snapshot
            .staff
            .iter_mut()
            .find(|member| &member.id == id)
            .ok_or_else(|| CoreError::not_found(RecordKind::Staff, id.as_str()))?;

        member.is_active = !member.is_active;
        member.year_ended = if member.is_active { None } else { Some(year) };
        let active = member.is_active;
        debug!(staff_id = %id, active, "staff status toggled");
        self.commit();
        Ok(active)
    }

    // ---- schedule ---------------------------------------------------------

    /// Inserts or replaces the slot at the entry's natural key and returns
    /// its id. A replaced slot keeps its id.
    pub fn upsert_schedule_slot(&mut self, entry: SlotEntry) -> RecordId {
        let key = entry.key;
        let id = self.state.snapshot.schedule_slots.upsert(entry);
        debug!(slot_id = %id, %key, "schedule slot upserted");
        self.commit();
        id
    }

    /// Changes one field of the slot at `key`, creating an unassigned slot
    /// with default times first if none exists.
    pub fn edit_schedule_slot(&mut self, key: SlotKey, field: SlotField) -> RecordId {
        let mut entry = self
            .slot_at(&key)
            .map(SlotEntry::from)
            .unwrap_or_else(|| SlotEntry::blank(key));
        field.apply(&mut entry);
        self.upsert_schedule_slot(entry)
    }

    /// Removes a schedule slot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no slot has the id.
    pub fn clear_schedule_slot(&mut self, id: &RecordId) -> CoreResult<ScheduleSlot> {
        let removed = self
            .state
            .snapshot
            .schedule_slots
            .remove_by_id(id)
            .ok_or_else(|| CoreError::not_found(RecordKind::ScheduleSlot, id.as_str()))?;
        debug!(slot_id = %id, "schedule slot cleared");
        self.commit();
        Ok(removed)
    }

    // ---- lessons ----------------------------------------------------------

    /// Appends a lesson record and returns the generated id.
    pub fn add_lesson(&mut self, lesson: NewLesson) -> RecordId {
        let record = lesson.into_record();
        let id = record.id.clone();
        debug!(lesson_id = %id, "lesson added");
        self.state.snapshot.lessons.push(record);
        self.commit();
        id
    }

    /// Logs a lesson for a scheduled period, taking subject and staff from
    /// the timetable slot of that weekday.
    ///
    /// # Errors
    ///
    /// Returns `NoScheduledSlot` if the date is a weekend or the period has
    /// no slot.
    pub fn log_scheduled_lesson(
        &mut self,
        date: NaiveDate,
        class: SchoolClass,
        period: u8,
        captured_at: impl Into<String>,
        image: impl Into<String>,
    ) -> CoreResult<RecordId> {
        let slot = Day::of(date)
            .and_then(|day| self.slot_at(&SlotKey::new(day, class, period)))
            .ok_or_else(|| CoreError::NoScheduledSlot {
                class: class.to_string(),
                period,
                date: date.to_string(),
            })?;

        let lesson = NewLesson {
            class_section: class,
            date,
            period_number: period,
            subject: slot.subject.clone(),
            staff_id: slot.staff_id.clone(),
            captured_at: captured_at.into(),
            image: image.into(),
        };
        Ok(self.add_lesson(lesson))
    }

    /// Removes a lesson record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no lesson has the id.
    pub fn delete_lesson(&mut self, id: &RecordId) -> CoreResult<LessonRecord> {
        let lessons = &mut self.state.snapshot.lessons;
        let index = lessons
            .iter()
            .position(|lesson| &lesson.id == id)
            .ok_or_else(|| CoreError::not_found(RecordKind::Lesson, id.as_str()))?;
        let removed = lessons.remove(index);
        debug!(lesson_id = %id, "lesson deleted");
        self.commit();
        Ok(removed)
    }

    // ---- homework ---------------------------------------------------------

    /// Appends a homework record and returns the generated id.
    pub fn add_homework(&mut self, homework: NewHomework) -> RecordId {
        let record = homework.into_record();
        let id = record.id.clone();
        debug!(homework_id = %id, "homework added");
        self.state.snapshot.homework.push(record);
        self.commit();
        id
    }

    /// Removes a homework record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no homework has the id.
    pub fn delete_homework(&mut self, id: &RecordId) -> CoreResult<HomeworkRecord> {
        let homework = &mut self.state.snapshot.homework;
        let index = homework
            .iter()
            .position(|record| &record.id == id)
            .ok_or_else(|| CoreError::not_found(RecordKind::Homework, id.as_str()))?;
        let removed = homework.remove(index);
        debug!(homework_id = %id, "homework deleted");
        self.commit();
        Ok(removed)
    }

    // ---- credential -------------------------------------------------------

    /// Sets the sync credential. A blank token removes it. Returns true if
    /// a credential is configured afterwards.
    pub fn set_credential(&mut self, token: &str, remote_id: Option<String>) -> bool {
        self.state.credential = SyncCredential::new(token, remote_id);
        let configured = self.state.credential.is_some();
        debug!(configured, "sync credential set");
        self.commit();
        configured
    }

    /// Records the remote document id for future pushes. Returns false,
    /// changing nothing, if no credential is configured.
    pub fn set_remote_id(&mut self, remote_id: &str) -> bool {
        let Some(credential) = self.state.credential.as_mut() else {
            return false;
        };
        credential.set_remote_id(Some(remote_id.to_string()));
        debug!(remote_id, "remote document id recorded");
        self.commit();
        true
    }

    /// Removes the sync credential.
    pub fn clear_credential(&mut self) {
        self.state.credential = None;
        debug!("sync credential cleared");
        self.commit();
    }

    // ---- whole-state exchange ---------------------------------------------

    /// Replaces the entire state, e.g. with a decoded pull. Callers decode
    /// with the current credential passed through so it survives.
    pub fn replace_state(&mut self, state: StoreState) {
        info!(
            records = state.snapshot.record_count(),
            "record store replaced"
        );
        self.state = state;
        self.commit();
    }

    /// Serializes the dataset for a manual backup. The credential is not
    /// included.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_backup(&self) -> CoreResult<String> {
        self.codec.encode(&self.state)
    }

    /// Replaces the dataset with a manual backup, keeping the local
    /// credential. The store is untouched if the document is malformed.
    ///
    /// # Errors
    ///
    /// Returns `MalformedSnapshot` if the document does not decode.
    pub fn import_backup(&mut self, document: &str) -> CoreResult<()> {
        let state = self.codec.decode(document, self.state.credential.clone())?;
        self.replace_state(state);
        Ok(())
    }
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("load_warning", &self.load_warning)
            .field("last_save_error", &self.last_save_error)
            .finish_non_exhaustive()
    }
}
