//! Manual export and import.
//!
//! Exports carry the whole dataset except the sync credential, in the same
//! format as remote backups, so an export can be re-imported or pushed.

use super::{confirm, CommandResult};
use academy_core::RecordStore;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes the dataset to `output`, or stdout.
pub fn export(store: &RecordStore, output: Option<&Path>) -> CommandResult {
    let document = store.export_backup()?;

    match output {
        Some(path) => {
            let mut file = fs::File::create(path)?;
            file.write_all(document.as_bytes())?;
            file.sync_all()?;
            info!(path = %path.display(), "export written");
            println!("✓ Export written");
            println!("  Path: {}", path.display());
            println!("  Records: {}", store.snapshot().record_count());
        }
        None => println!("{document}"),
    }
    Ok(())
}

/// Replaces the dataset with an export after confirmation.
pub fn import(store: &mut RecordStore, input: &Path, yes: bool) -> CommandResult {
    let document = fs::read_to_string(input)?;

    let prompt = format!("Replace ALL local data with {}?", input.display());
    if !confirm(&prompt, yes)? {
        println!("Cancelled");
        return Ok(());
    }
    store.import_backup(&document)?;
    println!(
        "✓ Imported {} records",
        store.snapshot().record_count()
    );
    Ok(())
}
