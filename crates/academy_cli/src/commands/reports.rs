//! Dashboard and daily report commands.

use super::CommandResult;
use academy_core::reports::{self, ClassFilter};
use academy_core::share::long_date;
use academy_core::{LessonRecord, RecordStore};
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;

/// Output format of the daily report.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text columns.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// A daily report as printed in JSON format.
#[derive(Debug, Serialize)]
pub struct DailyReport<'a> {
    /// Reported day.
    pub date: NaiveDate,
    /// Class filter, or `None` for every class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Homework set that day for the selected classes.
    pub homework_count: usize,
    /// Lessons logged that day, ordered by class and period.
    pub lessons: Vec<ReportedLesson<'a>>,
}

/// One lesson of a daily report.
#[derive(Debug, Serialize)]
pub struct ReportedLesson<'a> {
    /// The lesson record.
    #[serde(flatten)]
    pub lesson: &'a LessonRecord,
    /// Name of the staff member, if the record still exists.
    pub staff_name: Option<&'a str>,
}

/// Prints the dashboard for `date`.
pub fn dashboard(store: &RecordStore, date: NaiveDate) {
    let board = reports::dashboard(store, date);

    if let Some(user) = store.current_user() {
        println!("Welcome, {user}");
    }
    println!("{}", long_date(board.date));
    println!("  Active staff:     {}", board.active_staff);
    println!("  Lessons today:    {}", board.lessons_today);
    println!("  Homework today:   {}", board.homework_today);

    if !board.staff_activity.is_empty() {
        println!("Staff activity");
        for activity in &board.staff_activity {
            println!("  {:<24} {} lesson(s)", activity.name, activity.lessons);
        }
    }

    if !board.recent_lessons.is_empty() {
        println!("Recent lessons");
        for lesson in &board.recent_lessons {
            println!(
                "  {} {:<8} P{:<2} {:<16} {}",
                lesson.date,
                lesson.class_section,
                lesson.period_number,
                lesson.subject,
                store.staff_name(&lesson.staff_id).unwrap_or("unknown staff")
            );
        }
    }
}

/// Prints the lessons logged on `date`.
pub fn daily(
    store: &RecordStore,
    date: NaiveDate,
    filter: ClassFilter,
    format: OutputFormat,
) -> CommandResult {
    let report = DailyReport {
        date,
        class: match filter {
            ClassFilter::All => None,
            ClassFilter::Only(class) => Some(class.to_string()),
        },
        homework_count: reports::homework_on(store, date, filter).len(),
        lessons: reports::lessons_on(store, date, filter)
            .into_iter()
            .map(|lesson| ReportedLesson {
                lesson,
                staff_name: store.staff_name(&lesson.staff_id),
            })
            .collect(),
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            print_text_output(&report);
        }
    }
    Ok(())
}

fn print_text_output(report: &DailyReport<'_>) {
    let scope = report.class.as_deref().unwrap_or("All classes");
    println!("Daily report: {} ({scope})", long_date(report.date));
    println!("  Homework set: {}", report.homework_count);

    if report.lessons.is_empty() {
        println!("  No lessons logged");
        return;
    }
    for entry in &report.lessons {
        let lesson = entry.lesson;
        println!(
            "  {:<8} P{:<2} {:<16} {:<24} {}",
            lesson.class_section,
            lesson.period_number,
            lesson.subject,
            entry.staff_name.unwrap_or("unknown staff"),
            lesson.captured_at
        );
    }
}
