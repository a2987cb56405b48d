//! Property-based test generators using proptest.
//!
//! Strategies produce record inputs that are valid by construction, plus
//! [`StoreSeed`], a replayable recipe for a populated record store.

use academy_core::{
    Day, Gender, NewHomework, NewLesson, NewStaff, RecordId, RecordStore, SchoolClass, SlotEntry,
    SlotKey,
};
use chrono::NaiveDate;
use proptest::prelude::*;

/// Strategy for class sections.
pub fn school_class_strategy() -> impl Strategy<Value = SchoolClass> {
    prop::sample::select(SchoolClass::ALL.to_vec())
}

/// Strategy for teaching days.
pub fn day_strategy() -> impl Strategy<Value = Day> {
    prop::sample::select(Day::ALL.to_vec())
}

/// Strategy for genders.
pub fn gender_strategy() -> impl Strategy<Value = Gender> {
    prop_oneof![Just(Gender::Male), Just(Gender::Female), Just(Gender::Other)]
}

/// Strategy for dates in the 2024 school year.
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1u32..=12, 1u32..=28).prop_map(|(month, day)| {
        NaiveDate::from_ymd_opt(2024, month, day).expect("Day 1-28 exists in every month")
    })
}

/// Strategy for `HH:MM` times.
pub fn time_strategy() -> impl Strategy<Value = String> {
    (7u32..18, 0u32..60).prop_map(|(h, m)| format!("{h:02}:{m:02}"))
}

/// Strategy for short free-text fields, unicode included.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-zé ]{1,16}").expect("Invalid regex")
}

/// Strategy for schedule slot keys.
pub fn slot_key_strategy() -> impl Strategy<Value = SlotKey> {
    (day_strategy(), school_class_strategy(), 1u8..=8)
        .prop_map(|(day, class, period)| SlotKey::new(day, class, period))
}

/// Strategy for new staff members.
pub fn new_staff_strategy() -> impl Strategy<Value = NewStaff> {
    (
        text_strategy(),
        gender_strategy(),
        prop::string::string_regex("0[0-9]{9}").expect("Invalid regex"),
        prop::option::of(text_strategy()),
        2000i32..2025,
    )
        .prop_map(|(name, gender, phone, specialization, year_started)| NewStaff {
            name,
            gender,
            phone,
            email: None,
            specialization,
            year_started,
        })
}

/// Strategy for schedule entries: key, subject, staff index (or vacant),
/// start and end time.
pub fn slot_entry_strategy() -> impl Strategy<Value = (SlotKey, String, Option<usize>, String, String)> {
    (
        slot_key_strategy(),
        text_strategy(),
        prop::option::of(0usize..8),
        time_strategy(),
        time_strategy(),
    )
}

/// Strategy for lessons (staff as an index, resolved by [`StoreSeed`]).
pub fn lesson_strategy() -> impl Strategy<Value = (SchoolClass, NaiveDate, u8, String, usize)> {
    (
        school_class_strategy(),
        date_strategy(),
        1u8..=8,
        text_strategy(),
        0usize..8,
    )
}

/// Strategy for new homework.
pub fn new_homework_strategy() -> impl Strategy<Value = NewHomework> {
    (
        school_class_strategy(),
        date_strategy(),
        text_strategy(),
        text_strategy(),
        prop::option::of(Just("data:image/png;base64,AAAA".to_string())),
    )
        .prop_map(|(class_section, date, subject, description, image)| NewHomework {
            class_section,
            date,
            subject,
            description,
            image,
        })
}

/// A replayable recipe for a populated record store.
///
/// Staff references in slots and lessons are indices into `staff`, taken
/// modulo its length, so every seed yields a consistent store.
#[derive(Debug, Clone)]
pub struct StoreSeed {
    /// Staff to add, in order.
    pub staff: Vec<NewStaff>,
    /// Staff members (by index) to deactivate afterwards.
    pub deactivate: Vec<usize>,
    /// Schedule entries to upsert.
    pub slots: Vec<(SlotKey, String, Option<usize>, String, String)>,
    /// Lessons to add.
    pub lessons: Vec<(SchoolClass, NaiveDate, u8, String, usize)>,
    /// Homework to add.
    pub homework: Vec<NewHomework>,
    /// Signed-in user.
    pub current_user: Option<String>,
}

impl StoreSeed {
    /// Applies the recipe to `store`, returning the staff ids in order.
    pub fn apply(&self, store: &mut RecordStore) -> Vec<RecordId> {
        let ids: Vec<RecordId> = self
            .staff
            .iter()
            .cloned()
            .map(|member| store.add_staff(member))
            .collect();
        let pick = |index: usize| -> RecordId {
            if ids.is_empty() {
                RecordId::empty()
            } else {
                ids[index % ids.len()].clone()
            }
        };

        for &index in &self.deactivate {
            if !ids.is_empty() {
                let id = pick(index);
                if store.staff_member(&id).is_some_and(|m| m.is_active) {
                    store
                        .toggle_staff_status_in(&id, 2024)
                        .expect("Staff id was just added");
                }
            }
        }

        for (key, subject, staff, start_time, end_time) in &self.slots {
            store.upsert_schedule_slot(SlotEntry {
                key: *key,
                subject: subject.clone(),
                staff_id: staff.map_or_else(RecordId::empty, pick),
                start_time: start_time.clone(),
                end_time: end_time.clone(),
            });
        }

        for (class_section, date, period_number, subject, staff) in &self.lessons {
            store.add_lesson(NewLesson {
                class_section: *class_section,
                date: *date,
                period_number: *period_number,
                subject: subject.clone(),
                staff_id: pick(*staff),
                captured_at: "09:00".to_string(),
                image: "data:image/png;base64,AAAA".to_string(),
            });
        }

        for homework in &self.homework {
            store.add_homework(homework.clone());
        }

        if let Some(user) = &self.current_user {
            store.login(user);
        }
        ids
    }

    /// Builds a fresh in-memory store from the recipe.
    pub fn build(&self) -> RecordStore {
        let mut store = RecordStore::in_memory();
        self.apply(&mut store);
        store
    }
}

/// Strategy for populated store recipes.
pub fn store_seed_strategy() -> impl Strategy<Value = StoreSeed> {
    (
        prop::collection::vec(new_staff_strategy(), 0..6),
        prop::collection::vec(0usize..8, 0..3),
        prop::collection::vec(slot_entry_strategy(), 0..12),
        prop::collection::vec(lesson_strategy(), 0..10),
        prop::collection::vec(new_homework_strategy(), 0..5),
        prop::option::of(text_strategy()),
    )
        .prop_map(
            |(staff, deactivate, slots, lessons, homework, current_user)| StoreSeed {
                staff,
                deactivate,
                slots,
                lessons,
                homework,
                current_user,
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::ValueTree;
    use proptest::test_runner::TestRunner;

    #[test]
    fn seeds_build_consistent_stores() {
        let mut runner = TestRunner::default();
        for _ in 0..20 {
            let seed = store_seed_strategy()
                .new_tree(&mut runner)
                .unwrap()
                .current();
            let store = seed.build();
            assert_eq!(store.staff().len(), seed.staff.len());
            assert_eq!(store.lessons().len(), seed.lessons.len());
            assert!(store.schedule().len() <= seed.slots.len());
        }
    }
}
