//! Homework commands.

use super::{confirm, CommandResult};
use academy_core::reports::{homework_on, ClassFilter};
use academy_core::share::{fallback_link, homework_message};
use academy_core::{
    image, CoreError, HomeworkRecord, NewHomework, RecordId, RecordKind, RecordStore, SchoolClass,
};
use chrono::NaiveDate;
use std::path::Path;

fn find<'a>(store: &'a RecordStore, id: &RecordId) -> CommandResult<&'a HomeworkRecord> {
    store
        .homework()
        .iter()
        .find(|homework| &homework.id == id)
        .ok_or_else(|| CoreError::not_found(RecordKind::Homework, id.as_str()).into())
}

/// Adds homework.
pub fn add(
    store: &mut RecordStore,
    class: SchoolClass,
    date: NaiveDate,
    subject: String,
    description: String,
    image_path: Option<&Path>,
) -> CommandResult {
    let image = image_path.map(image::encode_image_file).transpose()?;
    let id = store.add_homework(NewHomework {
        class_section: class,
        date,
        subject,
        description,
        image,
    });
    println!("✓ Added homework {id}");
    Ok(())
}

/// Lists homework.
pub fn list(store: &RecordStore, date: Option<NaiveDate>, filter: ClassFilter) {
    let homework: Vec<&HomeworkRecord> = match date {
        Some(date) => homework_on(store, date, filter),
        None => store
            .homework()
            .iter()
            .filter(|homework| filter.matches(homework.class_section))
            .collect(),
    };

    if homework.is_empty() {
        println!("No homework");
        return;
    }
    for item in homework {
        let image = if item.image.is_some() { " [image]" } else { "" };
        println!(
            "{}  {} {:<8} {:<16}{}",
            item.id, item.date, item.class_section, item.subject, image
        );
        println!("    {}", item.description);
    }
}

/// Deletes homework after confirmation.
pub fn delete(store: &mut RecordStore, id: &str, yes: bool) -> CommandResult {
    let id = RecordId::from(id);
    let item = find(store, &id)?;
    let prompt = format!("Delete the {} homework of {}?", item.subject, item.class_section);
    if !confirm(&prompt, yes)? {
        println!("Cancelled");
        return Ok(());
    }
    store.delete_homework(&id)?;
    println!("✓ Deleted homework {id}");
    Ok(())
}

/// Prints the share message and messaging link for homework.
pub fn share(store: &RecordStore, id: &str) -> CommandResult {
    let item = find(store, &RecordId::from(id))?;
    let text = homework_message(item);
    println!("{text}");
    println!();
    println!("{}", fallback_link(&text));
    Ok(())
}
