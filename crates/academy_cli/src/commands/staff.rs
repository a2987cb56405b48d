//! Staff commands.

use super::{confirm, CommandResult};
use academy_core::{CoreError, Gender, NewStaff, RecordId, RecordKind, RecordStore};

/// Field changes requested by `staff update`. `None` keeps the field.
pub struct StaffChanges {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub specialization: Option<String>,
    pub year_started: Option<i32>,
}

fn blank_to_none(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Lists staff members.
pub fn list(store: &RecordStore, active_only: bool) {
    let members: Vec<_> = store
        .staff()
        .iter()
        .filter(|member| member.is_active || !active_only)
        .collect();
    if members.is_empty() {
        println!("No staff members");
        return;
    }

    for member in members {
        let status = match member.year_ended {
            Some(year) => format!("inactive since {year}"),
            None => "active".to_string(),
        };
        println!(
            "{}  {:<24} {:<8} {:<14} since {} ({})",
            member.id,
            member.name,
            member.gender,
            member.phone,
            member.year_started,
            status
        );
        if let Some(specialization) = &member.specialization {
            println!("    specialization: {specialization}");
        }
        if let Some(email) = &member.email {
            println!("    email: {email}");
        }
    }
}

/// Adds a staff member.
pub fn add(store: &mut RecordStore, staff: NewStaff) {
    let id = store.add_staff(staff);
    println!("✓ Added staff member {id}");
}

/// Applies field changes to a staff member.
pub fn update(store: &mut RecordStore, id: &str, changes: StaffChanges) -> CommandResult {
    let id = RecordId::from(id);
    let mut member = store
        .staff_member(&id)
        .cloned()
        .ok_or_else(|| CoreError::not_found(RecordKind::Staff, id.as_str()))?;

    if let Some(name) = changes.name {
        member.name = name;
    }
    if let Some(gender) = changes.gender {
        member.gender = gender;
    }
    if let Some(phone) = changes.phone {
        member.phone = phone;
    }
    if let Some(email) = changes.email {
        member.email = blank_to_none(email);
    }
    if let Some(specialization) = changes.specialization {
        member.specialization = blank_to_none(specialization);
    }
    if let Some(year) = changes.year_started {
        member.year_started = year;
    }

    store.update_staff(member)?;
    println!("✓ Updated staff member {id}");
    Ok(())
}

/// Deletes a staff member after confirmation.
pub fn delete(store: &mut RecordStore, id: &str, yes: bool) -> CommandResult {
    let id = RecordId::from(id);
    let name = store
        .staff_name(&id)
        .ok_or_else(|| CoreError::not_found(RecordKind::Staff, id.as_str()))?
        .to_string();
    let assigned = store.schedule().iter().filter(|s| s.staff_id == id).count();

    let prompt = format!("Delete {name} and vacate {assigned} timetable slot(s)?");
    if !confirm(&prompt, yes)? {
        println!("Cancelled");
        return Ok(());
    }
    store.delete_staff(&id)?;
    println!("✓ Deleted {name}");
    Ok(())
}

/// Activates or deactivates a staff member.
pub fn toggle(store: &mut RecordStore, id: &str) -> CommandResult {
    let id = RecordId::from(id);
    let active = store.toggle_staff_status(&id)?;
    if active {
        println!("✓ {id} is active again");
    } else {
        println!("✓ {id} is now inactive");
    }
    Ok(())
}
