/// Main entry point for the FocusFlow command line
///
/// This file sets up logging, parses command line arguments, opens the
/// database and dispatches to the command layer.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use focusflow::commands::{self, CreateHabitParams, HeatmapParams, ListHabitsParams, StatusParams, ToggleHabitParams};
use focusflow::config::{self, AppConfig};
use focusflow::FocusFlow;

/// Command line arguments for FocusFlow
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, env = "FOCUSFLOW_DB", global = true)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create, toggle and inspect habits
    #[command(subcommand)]
    Habit(HabitCommand),
    /// Export, import or wipe all data
    #[command(subcommand)]
    Data(DataCommand),
    /// Read and write settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand, Debug)]
enum HabitCommand {
    /// Create a new habit
    Create {
        name: String,
        #[arg(long)]
        icon: Option<String>,
        /// Hex color such as #6366f1
        #[arg(long)]
        color: Option<String>,
        /// daily, weekdays, weekends or weekly
        #[arg(long)]
        frequency: Option<String>,
    },
    /// Mark or unmark a day as completed
    Toggle {
        habit_id: String,
        /// Day to toggle (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// List habits
    List {
        /// name, streak or created
        #[arg(long)]
        sort: Option<String>,
    },
    /// Show streak details
    Status { habit_id: Option<String> },
    /// Show the completion heatmap
    Heatmap {
        #[arg(long)]
        days: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
enum DataCommand {
    /// Write a JSON snapshot to stdout or a file
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore a JSON snapshot
    Import { file: PathBuf },
    /// Delete all data
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Get { key: String },
    /// Value is parsed as JSON, falling back to a plain string
    Set { key: String, value: String },
    Remove { key: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(config::log_filter(args.debug, args.verbose))
        .with_writer(std::io::stderr) // Keep stdout for command output
        .init();

    let config = AppConfig::resolve(args.database)?;

    info!("Using database at: {}", config.database_path.display());

    let mut app = FocusFlow::new(config.database_path).await?;

    let message = match args.command {
        Command::Habit(HabitCommand::Create { name, icon, color, frequency }) => {
            let params = CreateHabitParams { name, icon, color, frequency };
            commands::create_habit(&mut app, params).await?.message
        }
        Command::Habit(HabitCommand::Toggle { habit_id, date }) => {
            commands::toggle_habit(&mut app, ToggleHabitParams { habit_id, date }).await?.message
        }
        Command::Habit(HabitCommand::List { sort }) => {
            commands::list_habits(&app, ListHabitsParams { sort_by: sort })?.message
        }
        Command::Habit(HabitCommand::Status { habit_id }) => {
            commands::get_habit_status(&app, StatusParams { habit_id })?.message
        }
        Command::Habit(HabitCommand::Heatmap { days }) => {
            commands::habit_heatmap(&app, HeatmapParams { days })?.message
        }
        Command::Data(DataCommand::Export { output }) => {
            let snapshot = commands::export_data(&app).await?;
            let json = serde_json::to_string_pretty(&snapshot)?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, json).await?;
                    format!("Exported {} records to {}", snapshot.record_count(), path.display())
                }
                None => json,
            }
        }
        Command::Data(DataCommand::Import { file }) => {
            let text = tokio::fs::read_to_string(&file).await?;
            let snapshot = commands::parse_snapshot(&text)?;
            commands::import_data(&mut app, snapshot).await?.message
        }
        Command::Data(DataCommand::Clear { yes }) => commands::clear_data(&mut app, yes).await?.message,
        Command::Settings(SettingsCommand::Get { key }) => commands::get_setting(&app, &key).await?.message,
        Command::Settings(SettingsCommand::Set { key, value }) => {
            commands::set_setting(&app, &key, &value).await?.message
        }
        Command::Settings(SettingsCommand::Remove { key }) => {
            commands::remove_setting(&app, &key).await?.message
        }
    };

    println!("{}", message);
    Ok(())
}
