//! Test fixtures and store helpers.
//!
//! Provides ready-made record stores and record builders for tests.

use academy_core::{
    Config, Day, Gender, NewHomework, NewLesson, NewStaff, RecordId, RecordStore, SchoolClass,
    SlotEntry, SlotKey,
};
use academy_storage::FileStore;
use chrono::NaiveDate;
use std::path::Path;
use tempfile::TempDir;

/// A test record store with automatic cleanup.
pub struct TestStore {
    /// The record store.
    pub store: RecordStore,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Creates an empty in-memory store.
    pub fn memory() -> Self {
        Self {
            store: RecordStore::in_memory(),
            temp_dir: None,
        }
    }

    /// Creates an empty store in a fresh temporary directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let backend = FileStore::open(temp_dir.path()).expect("Failed to open file store");
        Self {
            store: RecordStore::open(backend, Config::default()),
            temp_dir: Some(temp_dir),
        }
    }

    /// Returns the data directory if file-based.
    pub fn dir(&self) -> Option<&Path> {
        self.temp_dir.as_ref().map(TempDir::path)
    }

    /// Closes the store and reopens it from the same directory.
    ///
    /// # Panics
    ///
    /// Panics for in-memory stores.
    pub fn reopen(self) -> Self {
        let temp_dir = self.temp_dir.expect("Only file stores can be reopened");
        drop(self.store);
        let backend = FileStore::open(temp_dir.path()).expect("Failed to reopen file store");
        Self {
            store: RecordStore::open(backend, Config::default()),
            temp_dir: Some(temp_dir),
        }
    }
}

impl std::ops::Deref for TestStore {
    type Target = RecordStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl std::ops::DerefMut for TestStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

/// Builds a staff member with placeholder contact details.
pub fn staff(name: &str) -> NewStaff {
    NewStaff {
        name: name.to_string(),
        gender: Gender::Other,
        phone: "0700000000".to_string(),
        email: None,
        specialization: None,
        year_started: 2020,
    }
}

/// Builds a schedule entry with default times.
pub fn slot(day: Day, class: SchoolClass, period: u8, subject: &str, staff_id: &RecordId) -> SlotEntry {
    SlotEntry {
        subject: subject.to_string(),
        staff_id: staff_id.clone(),
        ..SlotEntry::blank(SlotKey::new(day, class, period))
    }
}

/// Builds a calendar date.
///
/// # Panics
///
/// Panics on an invalid date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("Invalid date")
}

/// Ids of the records in [`scenarios::small_academy`].
#[derive(Debug, Clone)]
pub struct AcademyIds {
    /// Mathematics teacher, teaching Grade 1.
    pub math_teacher: RecordId,
    /// Science teacher, teaching Grade 1 and Grade 2.
    pub science_teacher: RecordId,
    /// Former staff member, inactive since 2023.
    pub former_teacher: RecordId,
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Populates `store` with three staff members, a Monday timetable,
    /// two logged lessons and one homework, all on Monday 2024-05-06.
    pub fn small_academy(store: &mut RecordStore) -> AcademyIds {
        let math_teacher = store.add_staff(staff("Amina Yusuf"));
        let science_teacher = store.add_staff(staff("Omar Hassan"));
        let former_teacher = store.add_staff(staff("Grace Mwangi"));
        store
            .toggle_staff_status_in(&former_teacher, 2023)
            .expect("Failed to deactivate staff");

        store.upsert_schedule_slot(slot(Day::Monday, SchoolClass::Grade1, 1, "Math", &math_teacher));
        store.upsert_schedule_slot(slot(Day::Monday, SchoolClass::Grade1, 2, "Science", &science_teacher));
        store.upsert_schedule_slot(slot(Day::Monday, SchoolClass::Grade2, 1, "Science", &science_teacher));

        let monday = date(2024, 5, 6);
        for period in [1, 2] {
            store
                .log_scheduled_lesson(monday, SchoolClass::Grade1, period, "09:00", "data:image/png;base64,")
                .expect("Failed to log lesson");
        }
        store.add_homework(NewHomework {
            class_section: SchoolClass::Grade1,
            date: monday,
            subject: "Math".to_string(),
            description: "Exercises 1 to 10".to_string(),
            image: None,
        });

        AcademyIds {
            math_teacher,
            science_teacher,
            former_teacher,
        }
    }

    /// A lesson for an unscheduled period, bypassing the timetable.
    pub fn ad_hoc_lesson(staff_id: &RecordId, date: NaiveDate) -> NewLesson {
        NewLesson {
            class_section: SchoolClass::Kg1,
            date,
            period_number: 7,
            subject: "Assembly".to_string(),
            staff_id: staff_id.clone(),
            captured_at: "14:00".to_string(),
            image: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = TestStore::memory();
        assert!(store.dir().is_none());
        assert!(store.staff().is_empty());
    }

    #[test]
    fn test_file_store_reopen() {
        let mut store = TestStore::file();
        let ids = scenarios::small_academy(&mut store);

        let store = store.reopen();
        assert_eq!(store.staff().len(), 3);
        assert_eq!(store.schedule().len(), 3);
        assert_eq!(store.lessons().len(), 2);
        assert!(!store.staff_member(&ids.former_teacher).unwrap().is_active);
    }
}
