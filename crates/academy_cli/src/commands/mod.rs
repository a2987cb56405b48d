//! CLI command implementations.

pub mod backup;
pub mod homework;
pub mod lessons;
pub mod reports;
pub mod schedule;
pub mod session;
pub mod staff;
pub mod sync;

use academy_core::{Config, RecordStore};
use academy_storage::FileStore;
use chrono::{Local, NaiveDate};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::warn;

/// Result type of command implementations.
pub type CommandResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Opens the record store in `data_dir`, creating the directory if needed.
pub fn open_store(data_dir: &Path) -> CommandResult<RecordStore> {
    let backend = FileStore::open(data_dir)?;
    let store = RecordStore::open(backend, Config::default());
    if let Some(warning) = store.load_warning() {
        eprintln!("! {warning}; starting with an empty dataset");
    }
    Ok(store)
}

/// Today's local date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Asks the user to confirm a destructive action. `assume_yes` skips the
/// prompt.
pub fn confirm(prompt: &str, assume_yes: bool) -> CommandResult<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Warns if the last write did not reach disk.
pub fn report_save_error(store: &RecordStore) {
    if let Some(error) = store.last_save_error() {
        warn!(error, "changes are kept in memory only");
        eprintln!("! changes could not be saved: {error}");
    }
}
