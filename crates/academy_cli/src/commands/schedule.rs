//! Timetable commands.

use super::CommandResult;
use academy_core::{Day, RecordId, RecordStore, SchoolClass, SlotEntry, SlotField, SlotKey};

/// Prints the timetable of one class, grouped by day.
pub fn show(store: &RecordStore, class: SchoolClass, day: Option<Day>) {
    let days: Vec<Day> = day.map_or_else(|| Day::ALL.to_vec(), |d| vec![d]);

    println!("Timetable for {class}");
    for day in days {
        println!("{day}");
        let mut empty = true;
        for slot in store.schedule().for_day(day, class) {
            empty = false;
            let staff = if slot.is_vacant() {
                "vacant"
            } else {
                store.staff_name(&slot.staff_id).unwrap_or("unknown staff")
            };
            println!(
                "  P{:<2} {}-{}  {:<16} {:<24} [{}]",
                slot.period_number, slot.start_time, slot.end_time, slot.subject, staff, slot.id
            );
        }
        if empty {
            println!("  (no periods)");
        }
    }
}

/// Creates or replaces a slot.
pub fn set(store: &mut RecordStore, entry: SlotEntry) {
    let key = entry.key;
    let id = store.upsert_schedule_slot(entry);
    println!("✓ {key} saved ({id})");
}

/// Builds the single field edit requested on the command line.
pub fn field_from(
    subject: Option<String>,
    staff: Option<String>,
    start: Option<String>,
    end: Option<String>,
) -> CommandResult<SlotField> {
    let field = match (subject, staff, start, end) {
        (Some(subject), None, None, None) => SlotField::Subject(subject),
        (None, Some(staff), None, None) => SlotField::Staff(RecordId::from(staff)),
        (None, None, Some(start), None) => SlotField::StartTime(start),
        (None, None, None, Some(end)) => SlotField::EndTime(end),
        _ => return Err("give exactly one of --subject, --staff, --start, --end".into()),
    };
    Ok(field)
}

/// Edits one field of a slot.
pub fn edit(store: &mut RecordStore, key: SlotKey, field: SlotField) {
    let id = store.edit_schedule_slot(key, field);
    println!("✓ {key} updated ({id})");
}

/// Removes a slot.
pub fn clear(store: &mut RecordStore, id: &str) -> CommandResult {
    let id = RecordId::from(id);
    let removed = store.clear_schedule_slot(&id)?;
    println!("✓ Cleared {}", removed.key());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_from_requires_exactly_one() {
        assert_eq!(
            field_from(Some("Math".into()), None, None, None).unwrap(),
            SlotField::Subject("Math".into())
        );
        assert_eq!(
            field_from(None, Some(String::new()), None, None).unwrap(),
            SlotField::Staff(RecordId::empty())
        );
        assert!(field_from(None, None, None, None).is_err());
        assert!(field_from(Some("a".into()), None, Some("08:00".into()), None).is_err());
    }
}
