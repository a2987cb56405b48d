//! Academy CLI
//!
//! Command-line front end for the academy record store.
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` - Session
//! - `staff` - Add, update, delete and activate/deactivate staff
//! - `schedule` - View and edit the weekly timetable
//! - `lesson` - Log lessons against the timetable, list and share them
//! - `homework` - Add, list, delete and share homework
//! - `dashboard` / `report` - Daily summaries
//! - `sync` - Push/pull backups and manage the sync token
//! - `export` / `import` - Manual JSON backups

mod commands;

use academy_core::{Day, Gender, SchoolClass};
use academy_sync_engine::DEFAULT_API_BASE;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use commands::reports::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Local-first academic records: staff, timetable, lessons and homework.
#[derive(Parser)]
#[command(name = "academy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the local data
    #[arg(global = true, long, env = "ACADEMY_DATA_DIR", default_value = "./academy-data")]
    data_dir: PathBuf,

    /// Base URL of the backup API
    #[arg(global = true, long, env = "ACADEMY_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    Login {
        /// User name
        username: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Manage staff members
    #[command(subcommand)]
    Staff(StaffCommand),

    /// View and edit the timetable
    #[command(subcommand)]
    Schedule(ScheduleCommand),

    /// Log and review lessons
    #[command(subcommand)]
    Lesson(LessonCommand),

    /// Manage homework
    #[command(subcommand)]
    Homework(HomeworkCommand),

    /// Show today's headline numbers
    Dashboard {
        /// Day to summarize (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show the lessons logged on a day
    Report {
        /// Day to report (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Restrict to one class
        #[arg(short, long)]
        class: Option<SchoolClass>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Back up to and restore from the remote document service
    #[command(subcommand)]
    Sync(SyncCommand),

    /// Write the dataset (without the sync token) as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the dataset with a JSON export
    Import {
        /// Export file to read
        input: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum StaffCommand {
    /// List staff members
    List {
        /// Only show active members
        #[arg(short, long)]
        active: bool,
    },

    /// Add a staff member
    Add {
        /// Full name
        #[arg(long)]
        name: String,

        /// Gender (male, female, other)
        #[arg(long)]
        gender: Gender,

        /// Phone number
        #[arg(long)]
        phone: String,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Subject specialization
        #[arg(long)]
        specialization: Option<String>,

        /// Year the member joined
        #[arg(long)]
        year_started: i32,
    },

    /// Change fields of a staff member
    Update {
        /// Staff id
        id: String,

        /// Full name
        #[arg(long)]
        name: Option<String>,

        /// Gender
        #[arg(long)]
        gender: Option<Gender>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Email address (empty to clear)
        #[arg(long)]
        email: Option<String>,

        /// Subject specialization (empty to clear)
        #[arg(long)]
        specialization: Option<String>,

        /// Year the member joined
        #[arg(long)]
        year_started: Option<i32>,
    },

    /// Delete a staff member and vacate their timetable slots
    Delete {
        /// Staff id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Activate or deactivate a staff member
    Toggle {
        /// Staff id
        id: String,
    },
}

#[derive(Subcommand)]
enum ScheduleCommand {
    /// Show the timetable of a class
    Show {
        /// Class section
        #[arg(short, long)]
        class: SchoolClass,

        /// Restrict to one day
        #[arg(short, long)]
        day: Option<Day>,
    },

    /// Create or replace a slot
    Set {
        /// Day
        #[arg(long)]
        day: Day,

        /// Class section
        #[arg(long)]
        class: SchoolClass,

        /// Period number
        #[arg(long)]
        period: u8,

        /// Subject
        #[arg(long)]
        subject: String,

        /// Staff id (omit for vacant)
        #[arg(long, default_value = "")]
        staff: String,

        /// Start time
        #[arg(long, default_value = "08:00")]
        start: String,

        /// End time
        #[arg(long, default_value = "09:00")]
        end: String,
    },

    /// Change one field of a slot, creating it if needed
    Edit {
        /// Day
        #[arg(long)]
        day: Day,

        /// Class section
        #[arg(long)]
        class: SchoolClass,

        /// Period number
        #[arg(long)]
        period: u8,

        /// New subject
        #[arg(long, group = "field")]
        subject: Option<String>,

        /// New staff id (empty to vacate)
        #[arg(long, group = "field")]
        staff: Option<String>,

        /// New start time
        #[arg(long, group = "field")]
        start: Option<String>,

        /// New end time
        #[arg(long, group = "field")]
        end: Option<String>,
    },

    /// Remove a slot
    Clear {
        /// Slot id
        id: String,
    },
}

#[derive(Subcommand)]
enum LessonCommand {
    /// Log a lesson for a scheduled period
    Log {
        /// Class section
        #[arg(short, long)]
        class: SchoolClass,

        /// Period number
        #[arg(short, long)]
        period: u8,

        /// Day taught (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Whiteboard image file
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Log even if a lesson exists for the period
        #[arg(long)]
        force: bool,
    },

    /// List lessons
    List {
        /// Restrict to one day
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Restrict to one class
        #[arg(short, long)]
        class: Option<SchoolClass>,
    },

    /// Delete a lesson
    Delete {
        /// Lesson id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print a share message and link for a lesson
    Share {
        /// Lesson id
        id: String,

        /// Use the archive wording
        #[arg(long)]
        archive: bool,
    },
}

#[derive(Subcommand)]
enum HomeworkCommand {
    /// Add homework
    Add {
        /// Class section
        #[arg(short, long)]
        class: SchoolClass,

        /// Subject
        #[arg(short, long)]
        subject: String,

        /// Instructions
        #[arg(long)]
        description: String,

        /// Day set (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Image file
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// List homework
    List {
        /// Restrict to one day
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Restrict to one class
        #[arg(short, long)]
        class: Option<SchoolClass>,
    },

    /// Delete homework
    Delete {
        /// Homework id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print a share message and link for homework
    Share {
        /// Homework id
        id: String,
    },
}

#[derive(Subcommand)]
enum SyncCommand {
    /// Set the access token and optionally a known remote backup id
    Token {
        /// Access token (empty to remove)
        token: String,

        /// Existing remote backup id
        #[arg(long)]
        remote_id: Option<String>,
    },

    /// Forget the access token and remote backup id
    Forget,

    /// Show the sync configuration
    Status,

    /// Upload the dataset
    Push,

    /// Replace the local dataset with the remote backup
    Pull {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("Academy CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("Academy Core v{}", academy_core::VERSION);
        return Ok(());
    }

    let mut store = commands::open_store(&cli.data_dir)?;
    let today = commands::today();

    match cli.command {
        Commands::Login { username } => commands::session::login(&mut store, &username)?,
        Commands::Logout => commands::session::logout(&mut store),
        Commands::Whoami => commands::session::whoami(&store),
        Commands::Staff(command) => match command {
            StaffCommand::List { active } => commands::staff::list(&store, active),
            StaffCommand::Add {
                name,
                gender,
                phone,
                email,
                specialization,
                year_started,
            } => commands::staff::add(
                &mut store,
                academy_core::NewStaff {
                    name,
                    gender,
                    phone,
                    email,
                    specialization,
                    year_started,
                },
            ),
            StaffCommand::Update {
                id,
                name,
                gender,
                phone,
                email,
                specialization,
                year_started,
            } => commands::staff::update(
                &mut store,
                &id,
                commands::staff::StaffChanges {
                    name,
                    gender,
                    phone,
                    email,
                    specialization,
                    year_started,
                },
            )?,
            StaffCommand::Delete { id, yes } => commands::staff::delete(&mut store, &id, yes)?,
            StaffCommand::Toggle { id } => commands::staff::toggle(&mut store, &id)?,
        },
        Commands::Schedule(command) => match command {
            ScheduleCommand::Show { class, day } => commands::schedule::show(&store, class, day),
            ScheduleCommand::Set {
                day,
                class,
                period,
                subject,
                staff,
                start,
                end,
            } => commands::schedule::set(
                &mut store,
                academy_core::SlotEntry {
                    key: academy_core::SlotKey::new(day, class, period),
                    subject,
                    staff_id: staff.into(),
                    start_time: start,
                    end_time: end,
                },
            ),
            ScheduleCommand::Edit {
                day,
                class,
                period,
                subject,
                staff,
                start,
                end,
            } => {
                let field = commands::schedule::field_from(subject, staff, start, end)?;
                commands::schedule::edit(
                    &mut store,
                    academy_core::SlotKey::new(day, class, period),
                    field,
                );
            }
            ScheduleCommand::Clear { id } => commands::schedule::clear(&mut store, &id)?,
        },
        Commands::Lesson(command) => match command {
            LessonCommand::Log {
                class,
                period,
                date,
                image,
                force,
            } => commands::lessons::log(
                &mut store,
                date.unwrap_or(today),
                class,
                period,
                image.as_deref(),
                force,
            )?,
            LessonCommand::List { date, class } => {
                commands::lessons::list(&store, date, class.into());
            }
            LessonCommand::Delete { id, yes } => commands::lessons::delete(&mut store, &id, yes)?,
            LessonCommand::Share { id, archive } => commands::lessons::share(&store, &id, archive)?,
        },
        Commands::Homework(command) => match command {
            HomeworkCommand::Add {
                class,
                subject,
                description,
                date,
                image,
            } => commands::homework::add(
                &mut store,
                class,
                date.unwrap_or(today),
                subject,
                description,
                image.as_deref(),
            )?,
            HomeworkCommand::List { date, class } => {
                commands::homework::list(&store, date, class.into());
            }
            HomeworkCommand::Delete { id, yes } => {
                commands::homework::delete(&mut store, &id, yes)?;
            }
            HomeworkCommand::Share { id } => commands::homework::share(&store, &id)?,
        },
        Commands::Dashboard { date } => commands::reports::dashboard(&store, date.unwrap_or(today)),
        Commands::Report {
            date,
            class,
            format,
        } => commands::reports::daily(&store, date.unwrap_or(today), class.into(), format)?,
        Commands::Sync(command) => match command {
            SyncCommand::Token { token, remote_id } => {
                commands::sync::set_token(&mut store, &token, remote_id);
            }
            SyncCommand::Forget => commands::sync::forget(&mut store),
            SyncCommand::Status => commands::sync::status(&store),
            SyncCommand::Push => commands::sync::push(&mut store, &cli.api_base)?,
            SyncCommand::Pull { yes } => commands::sync::pull(&mut store, &cli.api_base, yes)?,
        },
        Commands::Export { output } => commands::backup::export(&store, output.as_deref())?,
        Commands::Import { input, yes } => commands::backup::import(&mut store, &input, yes)?,
        Commands::Version => {}
    }

    commands::report_save_error(&store);
    Ok(())
}
