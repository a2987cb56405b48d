//! Read-only summaries over the record store.

use crate::model::{HomeworkRecord, LessonRecord, RecordId, SchoolClass};
use crate::store::RecordStore;
use chrono::NaiveDate;

/// Number of active staff members listed on the dashboard.
pub const DASHBOARD_STAFF_LIMIT: usize = 5;

/// Number of most recently logged lessons shown on the dashboard.
pub const DASHBOARD_RECENT_LESSONS: usize = 4;

/// Class selection for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassFilter {
    /// Every class section.
    #[default]
    All,
    /// A single class section.
    Only(SchoolClass),
}

impl ClassFilter {
    /// Returns true if `class` passes the filter.
    #[must_use]
    pub fn matches(&self, class: SchoolClass) -> bool {
        match self {
            ClassFilter::All => true,
            ClassFilter::Only(only) => *only == class,
        }
    }
}

impl From<Option<SchoolClass>> for ClassFilter {
    fn from(class: Option<SchoolClass>) -> Self {
        class.map_or(ClassFilter::All, ClassFilter::Only)
    }
}

/// Lesson count of one staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffActivity {
    /// Staff member id.
    pub staff_id: RecordId,
    /// Staff member name.
    pub name: String,
    /// Lessons logged by the member, all time.
    pub lessons: usize,
}

/// Headline numbers for a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    /// Day the numbers refer to.
    pub date: NaiveDate,
    /// Active staff members.
    pub active_staff: usize,
    /// Lessons logged on `date`.
    pub lessons_today: usize,
    /// Homework set on `date`.
    pub homework_today: usize,
    /// Lesson totals of the first active staff members.
    pub staff_activity: Vec<StaffActivity>,
    /// Last logged lessons, newest first.
    pub recent_lessons: Vec<LessonRecord>,
}

/// Computes the dashboard for `date`.
#[must_use]
pub fn dashboard(store: &RecordStore, date: NaiveDate) -> Dashboard {
    let active = store.staff().iter().filter(|member| member.is_active);

    let staff_activity = active
        .clone()
        .take(DASHBOARD_STAFF_LIMIT)
        .map(|member| StaffActivity {
            staff_id: member.id.clone(),
            name: member.name.clone(),
            lessons: store
                .lessons()
                .iter()
                .filter(|lesson| lesson.staff_id == member.id)
                .count(),
        })
        .collect();

    let recent_lessons = store
        .lessons()
        .iter()
        .rev()
        .take(DASHBOARD_RECENT_LESSONS)
        .cloned()
        .collect();

    Dashboard {
        date,
        active_staff: active.count(),
        lessons_today: store.lessons().iter().filter(|l| l.date == date).count(),
        homework_today: store.homework().iter().filter(|h| h.date == date).count(),
        staff_activity,
        recent_lessons,
    }
}

/// Lessons logged on `date` for the selected classes, ordered by class and
/// period.
#[must_use]
pub fn lessons_on(store: &RecordStore, date: NaiveDate, filter: ClassFilter) -> Vec<&LessonRecord> {
    let mut lessons: Vec<&LessonRecord> = store
        .lessons()
        .iter()
        .filter(|lesson| lesson.date == date && filter.matches(lesson.class_section))
        .collect();
    lessons.sort_by_key(|lesson| (lesson.class_section, lesson.period_number));
    lessons
}

/// Homework set on `date` for the selected classes, in insertion order.
#[must_use]
pub fn homework_on(
    store: &RecordStore,
    date: NaiveDate,
    filter: ClassFilter,
) -> Vec<&HomeworkRecord> {
    store
        .homework()
        .iter()
        .filter(|homework| homework.date == date && filter.matches(homework.class_section))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender, NewHomework, NewLesson, NewStaff};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn add_staff(store: &mut RecordStore, name: &str) -> RecordId {
        store.add_staff(NewStaff {
            name: name.into(),
            gender: Gender::Male,
            phone: "1".into(),
            email: None,
            specialization: None,
            year_started: 2020,
        })
    }

    fn add_lesson(store: &mut RecordStore, staff: &RecordId, class: SchoolClass, date: NaiveDate, period: u8) {
        store.add_lesson(NewLesson {
            class_section: class,
            date,
            period_number: period,
            subject: "Math".into(),
            staff_id: staff.clone(),
            captured_at: "09:00".into(),
            image: String::new(),
        });
    }

    #[test]
    fn dashboard_counts() {
        let mut store = RecordStore::in_memory();
        let a = add_staff(&mut store, "A");
        let b = add_staff(&mut store, "B");
        store.toggle_staff_status_in(&b, 2023).unwrap();
        for name in ["C", "D", "E", "F", "G"] {
            add_staff(&mut store, name);
        }

        add_lesson(&mut store, &a, SchoolClass::Grade1, day(6), 1);
        add_lesson(&mut store, &a, SchoolClass::Grade1, day(7), 1);
        add_lesson(&mut store, &b, SchoolClass::Grade2, day(6), 2);
        store.add_homework(NewHomework {
            class_section: SchoolClass::Grade1,
            date: day(6),
            subject: "Math".into(),
            description: "p. 12".into(),
            image: None,
        });

        let board = dashboard(&store, day(6));
        assert_eq!(board.active_staff, 6);
        assert_eq!(board.lessons_today, 2);
        assert_eq!(board.homework_today, 1);

        let names: Vec<&str> = board.staff_activity.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "D", "E", "F"]);
        assert_eq!(board.staff_activity[0].lessons, 2);
    }

    #[test]
    fn dashboard_lists_last_four_lessons_newest_first() {
        let mut store = RecordStore::in_memory();
        let t = add_staff(&mut store, "T");
        for period in 1..=6 {
            add_lesson(&mut store, &t, SchoolClass::Grade1, day(6), period);
        }

        let board = dashboard(&store, day(6));
        let periods: Vec<u8> = board.recent_lessons.iter().map(|l| l.period_number).collect();
        assert_eq!(periods, vec![6, 5, 4, 3]);

        let empty = dashboard(&RecordStore::in_memory(), day(6));
        assert!(empty.recent_lessons.is_empty());
    }

    #[test]
    fn daily_report_filters_and_orders() {
        let mut store = RecordStore::in_memory();
        let t = add_staff(&mut store, "T");
        add_lesson(&mut store, &t, SchoolClass::Grade2, day(6), 3);
        add_lesson(&mut store, &t, SchoolClass::Grade1, day(6), 2);
        add_lesson(&mut store, &t, SchoolClass::Grade1, day(6), 1);
        add_lesson(&mut store, &t, SchoolClass::Grade1, day(7), 1);

        let all = lessons_on(&store, day(6), ClassFilter::All);
        let order: Vec<(SchoolClass, u8)> =
            all.iter().map(|l| (l.class_section, l.period_number)).collect();
        assert_eq!(
            order,
            vec![
                (SchoolClass::Grade1, 1),
                (SchoolClass::Grade1, 2),
                (SchoolClass::Grade2, 3)
            ]
        );

        let grade2 = lessons_on(&store, day(6), Some(SchoolClass::Grade2).into());
        assert_eq!(grade2.len(), 1);
        assert!(homework_on(&store, day(6), ClassFilter::All).is_empty());
    }
}
