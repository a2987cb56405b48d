//! Lesson commands.

use super::{confirm, CommandResult};
use academy_core::reports::{lessons_on, ClassFilter};
use academy_core::share::{fallback_link, lesson_archive_message, lesson_message};
use academy_core::{
    image, CoreError, Day, LessonRecord, RecordId, RecordKind, RecordStore, SchoolClass, SlotKey,
};
use chrono::{Local, NaiveDate};
use std::path::Path;

fn find<'a>(store: &'a RecordStore, id: &RecordId) -> CommandResult<&'a LessonRecord> {
    store
        .lessons()
        .iter()
        .find(|lesson| &lesson.id == id)
        .ok_or_else(|| CoreError::not_found(RecordKind::Lesson, id.as_str()).into())
}

/// Logs a lesson for a scheduled period.
pub fn log(
    store: &mut RecordStore,
    date: NaiveDate,
    class: SchoolClass,
    period: u8,
    image_path: Option<&Path>,
    force: bool,
) -> CommandResult {
    if store.has_lesson_for(date, class, period) && !force {
        return Err(format!(
            "a lesson is already logged for {class} period {period} on {date} (use --force)"
        )
        .into());
    }

    let image = match image_path {
        Some(path) => image::encode_image_file(path)?,
        None => String::new(),
    };
    let captured_at = Local::now().format("%H:%M").to_string();
    let id = store.log_scheduled_lesson(date, class, period, captured_at, image)?;

    let lesson = find(store, &id)?;
    println!("✓ Logged {} for {class} period {period} ({id})", lesson.subject);
    Ok(())
}

/// Lists lessons, newest first.
pub fn list(store: &RecordStore, date: Option<NaiveDate>, filter: ClassFilter) {
    let mut lessons: Vec<&LessonRecord> = match date {
        Some(date) => lessons_on(store, date, filter),
        None => store
            .lessons()
            .iter()
            .filter(|lesson| filter.matches(lesson.class_section))
            .collect(),
    };
    if date.is_none() {
        lessons.sort_by(|a, b| b.date.cmp(&a.date));
    }

    if lessons.is_empty() {
        println!("No lessons");
        return;
    }
    for lesson in lessons {
        let staff = store.staff_name(&lesson.staff_id).unwrap_or("unknown staff");
        let image = if lesson.image.is_empty() { "" } else { " [image]" };
        println!(
            "{}  {} {:<8} P{:<2} {:<16} {:<24} {}{}",
            lesson.id,
            lesson.date,
            lesson.class_section,
            lesson.period_number,
            lesson.subject,
            staff,
            lesson.captured_at,
            image
        );
    }
}

/// Deletes a lesson after confirmation.
pub fn delete(store: &mut RecordStore, id: &str, yes: bool) -> CommandResult {
    let id = RecordId::from(id);
    let lesson = find(store, &id)?;
    let prompt = format!(
        "Delete the {} lesson of {} on {}?",
        lesson.subject, lesson.class_section, lesson.date
    );
    if !confirm(&prompt, yes)? {
        println!("Cancelled");
        return Ok(());
    }
    store.delete_lesson(&id)?;
    println!("✓ Deleted lesson {id}");
    Ok(())
}

/// Prints the share message and messaging link for a lesson.
pub fn share(store: &RecordStore, id: &str, archive: bool) -> CommandResult {
    let lesson = find(store, &RecordId::from(id))?;
    let staff = store.staff_name(&lesson.staff_id);

    let text = if archive {
        lesson_archive_message(lesson, staff)
    } else {
        let slot = Day::of(lesson.date).and_then(|day| {
            store.slot_at(&SlotKey::new(day, lesson.class_section, lesson.period_number))
        });
        lesson_message(lesson, staff, slot)
    };

    println!("{text}");
    println!();
    println!("{}", fallback_link(&text));
    Ok(())
}
