//! Share-message formatting for lessons and homework.
//!
//! Messages are plain text with chat-style `*bold*` markers. When no native
//! share target is available the text is handed to a messaging web link
//! built by [`fallback_link`].

use crate::model::{HomeworkRecord, LessonRecord, ScheduleSlot};
use chrono::NaiveDate;

/// Prefix of the messaging link used when no share target is available.
pub const FALLBACK_LINK_BASE: &str = "https://wa.me/?text=";

/// Shown in place of a staff name whose record no longer exists.
pub const UNKNOWN_STAFF: &str = "Academic Staff";

const RULE: &str = "------------------------------";

/// Formats a date as e.g. `Monday, May 6, 2024`.
#[must_use]
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Message announcing a freshly logged lesson.
///
/// The period is shown with the slot's time range when the slot is known,
/// otherwise with the capture time.
#[must_use]
pub fn lesson_message(
    lesson: &LessonRecord,
    staff_name: Option<&str>,
    slot: Option<&ScheduleSlot>,
) -> String {
    let period_time = slot.map_or_else(
        || lesson.captured_at.clone(),
        |slot| format!("{} - {}", slot.start_time, slot.end_time),
    );

    format!(
        "🏫 *FOCUS ACADEMY - LESSON UPDATE*\n\
         {RULE}\n\
         📅 *Date:* {date}\n\
         👥 *Class:* {class}\n\
         📚 *Subject:* {subject}\n\
         🕒 *Period:* {period} ({period_time})\n\
         👨‍🏫 *Teacher:* {teacher}\n\
         \n\
         📖 *Details:* Today we covered key concepts in {subject}. Attached is the \
         whiteboard capture for your review and to help with student study.\n\
         \n\
         _Sent via Focus Academy Management Portal_",
        date = long_date(lesson.date),
        class = lesson.class_section,
        subject = lesson.subject,
        period = lesson.period_number,
        teacher = staff_name.unwrap_or(UNKNOWN_STAFF),
    )
}

/// Message re-sharing a lesson from the archive.
#[must_use]
pub fn lesson_archive_message(lesson: &LessonRecord, staff_name: Option<&str>) -> String {
    format!(
        "🏫 *FOCUS ACADEMY - ARCHIVED LOG*\n\
         📅 *Date:* {date}\n\
         👥 *Class:* {class}\n\
         📚 *Subject:* {subject}\n\
         🕒 *Session:* Period {period} ({captured_at})\n\
         👨‍🏫 *Lead:* {teacher}\n\
         \n\
         Whiteboard capture attached for review.",
        date = lesson.date,
        class = lesson.class_section,
        subject = lesson.subject,
        period = lesson.period_number,
        captured_at = lesson.captured_at,
        teacher = staff_name.unwrap_or(UNKNOWN_STAFF),
    )
}

/// Message sending a homework assignment to parents.
#[must_use]
pub fn homework_message(homework: &HomeworkRecord) -> String {
    format!(
        "📝 *FOCUS ACADEMY - HOMEWORK ALERT*\n\
         {RULE}\n\
         📅 *Assigned:* {date}\n\
         👥 *Grade:* {class}\n\
         📚 *Subject:* {subject}\n\
         \n\
         📖 *Homework Instructions:*\n\
         {description}\n\
         \n\
         💡 *Note for Parents:* Please guide the student to finish this task before \
         the next lesson. We appreciate your support in their academic journey.\n\
         \n\
         _Focus Academy Academic Department_",
        date = long_date(homework.date),
        class = homework.class_section,
        subject = homework.subject,
        description = homework.description,
    )
}

/// Messaging link carrying `text` percent-encoded.
#[must_use]
pub fn fallback_link(text: &str) -> String {
    format!("{FALLBACK_LINK_BASE}{}", urlencoding::encode(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Day, RecordId, SchoolClass, SlotEntry, SlotKey};

    fn lesson() -> LessonRecord {
        LessonRecord {
            id: "l1".into(),
            class_section: SchoolClass::Grade2,
            date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            period_number: 3,
            subject: "Science".into(),
            staff_id: "t1".into(),
            captured_at: "10:42".into(),
            image: String::new(),
        }
    }

    #[test]
    fn long_date_format() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        assert_eq!(long_date(date), "Monday, May 6, 2024");
    }

    #[test]
    fn lesson_message_uses_slot_times() {
        let slot = SlotEntry {
            start_time: "10:00".into(),
            end_time: "10:45".into(),
            ..SlotEntry::blank(SlotKey::new(Day::Monday, SchoolClass::Grade2, 3))
        }
        .into_slot(RecordId::from("s1"));

        let text = lesson_message(&lesson(), Some("Amina"), Some(&slot));
        assert!(text.contains("*Date:* Monday, May 6, 2024"));
        assert!(text.contains("*Class:* Grade 2"));
        assert!(text.contains("*Period:* 3 (10:00 - 10:45)"));
        assert!(text.contains("*Teacher:* Amina"));

        let text = lesson_message(&lesson(), None, None);
        assert!(text.contains("*Period:* 3 (10:42)"));
        assert!(text.contains(UNKNOWN_STAFF));
    }

    #[test]
    fn archive_and_homework_messages() {
        let text = lesson_archive_message(&lesson(), Some("Amina"));
        assert!(text.contains("*Date:* 2024-05-06"));
        assert!(text.contains("Period 3 (10:42)"));

        let homework = HomeworkRecord {
            id: "h1".into(),
            class_section: SchoolClass::Kg1,
            date: NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
            subject: "Phonics".into(),
            description: "Trace the letter B".into(),
            image: None,
        };
        let text = homework_message(&homework);
        assert!(text.contains("*Grade:* KG1"));
        assert!(text.contains("\nTrace the letter B\n"));
    }

    #[test]
    fn fallback_link_encodes_text() {
        assert_eq!(
            fallback_link("Grade 1 & more"),
            "https://wa.me/?text=Grade%201%20%26%20more"
        );
    }
}
