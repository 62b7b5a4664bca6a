//! Command-line front end for the Pomodoro core.
//!
//! # Responsibility
//! - Wire config, logging and SQLite storage into one `TodoStore`.
//! - Expose to-do, preference and statistics operations as subcommands.

use clap::{Parser, Subcommand};
use log::info;
use pomodoro_core::db::{open_db, open_db_in_memory};
use pomodoro_core::{
    init_logging, median, preference_sections, CoreConfig, PreferenceKind, SqliteKeyValueStore,
    TodoItem, TodoStore,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "pomodoro")]
#[command(about = "Manage the Pomodoro timer to-do list and settings")]
#[command(version)]
struct Cli {
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides config)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Directory for log files (overrides config)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides config)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a to-do item
    Add {
        /// Item text; may be empty
        #[arg(default_value = "")]
        text: String,
    },
    /// List to-do items in insertion order
    List,
    /// Toggle the completion flag of an item
    Done { id: Uuid },
    /// Delete an item
    Delete { id: Uuid },
    /// Print the preference catalog with defaults
    Prefs {
        /// Emit the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the median of the given numbers
    Median { values: Vec<f64> },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(&cli)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    match cli.command {
        Commands::Prefs { json } => print_preferences(json),
        Commands::Median { values } => {
            println!("{}", median(&values));
            Ok(())
        }
        command => run_todo_command(&config, command),
    }
}

fn resolve_config(cli: &Cli) -> Result<CoreConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.db_path = Some(db.clone());
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.validate()?;
    Ok(config)
}

fn run_todo_command(config: &CoreConfig, command: Commands) -> Result<(), Box<dyn Error>> {
    let conn = match &config.db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let store = TodoStore::open(SqliteKeyValueStore::new(&conn), config.todo_store_options())?;
    info!(
        "event=cli_command module=cli status=start todos={}",
        store.len()
    );

    match command {
        Commands::Add { text } => {
            let id = store.add_todo(text)?;
            println!("{id}");
        }
        Commands::List => {
            for todo in store.todos() {
                println!("{}", format_todo(&todo));
            }
        }
        Commands::Done { id } => match store.complete_todo(id)? {
            Some(true) => println!("{id} completed"),
            Some(false) => println!("{id} reopened"),
            None => println!("{id} not found"),
        },
        Commands::Delete { id } => {
            if store.delete_todo(id)? {
                println!("{id} deleted");
            } else {
                println!("{id} not found");
            }
        }
        Commands::Prefs { .. } | Commands::Median { .. } => {}
    }
    Ok(())
}

fn format_todo(todo: &TodoItem) -> String {
    let mark = if todo.completed { 'x' } else { ' ' };
    format!("[{mark}] {} {}", todo.id, todo.text)
}

fn print_preferences(json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(preference_sections())?);
        return Ok(());
    }

    for section in preference_sections() {
        println!("{}", section.title);
        for preference in &section.preferences {
            let default = match &preference.kind {
                PreferenceKind::Boolean { value } => value.to_string(),
                PreferenceKind::String { value } | PreferenceKind::Sounds { value, .. } => {
                    format!("\"{value}\"")
                }
                PreferenceKind::Number { value, .. } => value.to_string(),
            };
            println!(
                "  {:<24} {:<8} {:<10} {}",
                preference.reference,
                preference.kind.type_name(),
                default,
                preference.meta
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{format_todo, Cli, Commands};
    use clap::Parser;
    use pomodoro_core::TodoItem;

    #[test]
    fn parses_add_with_overrides() {
        let cli = Cli::try_parse_from(["pomodoro", "--db", "/tmp/p.sqlite3", "add", "focus"])
            .unwrap();
        assert_eq!(cli.db.unwrap().to_str(), Some("/tmp/p.sqlite3"));
        assert!(matches!(cli.command, Commands::Add { text } if text == "focus"));
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(Cli::try_parse_from(["pomodoro", "done", "not-a-uuid"]).is_err());
    }

    #[test]
    fn formats_completion_mark() {
        let mut todo = TodoItem::new("stretch", 0);
        assert!(format_todo(&todo).starts_with("[ ] "));
        todo.toggle();
        assert!(format_todo(&todo).ends_with(" stretch"));
        assert!(format_todo(&todo).starts_with("[x] "));
    }
}
