use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use taskquest::audio;
use taskquest::config::{Overrides, Settings};
use taskquest::store::TaskStore;
use taskquest::task::{Priority, Recurrence};
use taskquest::tracker::Tracker;

mod cmd;

#[derive(Parser)]
#[command(name = "taskquest")]
#[command(version, about = "Gamified personal task tracker")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the task database (defaults to the platform data directory)
    #[arg(long, global = true, env = "TASKQUEST_DB")]
    pub db: Option<PathBuf>,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true, env = "TASKQUEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable the terminal bell on completion and level-up
    #[arg(long, global = true)]
    pub no_sound: bool,

    /// Without a command the interactive menu starts
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    AddTask {
        name: String,

        /// Low, Medium, or High (case-insensitive)
        #[arg(short, long, default_value = "Medium")]
        priority: Priority,

        /// Effort estimate as HH:MM:SS
        #[arg(short, long)]
        duration: Option<String>,

        /// Spawn the next occurrence on completion: daily or weekly
        #[arg(short, long)]
        recurring: Option<Recurrence>,
    },
    /// List tasks
    ShowTasks {
        /// Only pending tasks
        #[arg(long)]
        pending: bool,

        #[arg(long)]
        json: bool,
    },
    /// Complete a pending task and earn XP by priority
    CompleteTask { id: i64 },
    /// Show level, XP, and streak
    ShowProgress {
        #[arg(long)]
        json: bool,
    },
    /// Start the interactive menu
    Menu,
    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Write a default config.toml
    Init,
    /// Print the config file location
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    taskquest::logging::init(cli.verbose);

    let settings = Settings::resolve(&Overrides {
        config_path: cli.config.clone(),
        db_path: cli.db.clone(),
        no_sound: cli.no_sound,
    })?;

    match cli.command {
        Some(Commands::Config { command }) => cmd::cmd_config(&settings, command)?,
        None | Some(Commands::Menu) => with_tracker(&settings, |t| cmd::cmd_menu(t, &settings))?,
        Some(Commands::AddTask {
            name,
            priority,
            duration,
            recurring,
        }) => with_tracker(&settings, |t| {
            cmd::cmd_add_task(t, &name, priority, duration.as_deref(), recurring)
        })?,
        Some(Commands::ShowTasks { pending, json }) => {
            with_tracker(&settings, |t| cmd::cmd_show_tasks(t, pending, json))?
        }
        Some(Commands::CompleteTask { id }) => {
            with_tracker(&settings, |t| cmd::cmd_complete_task(t, id))?
        }
        Some(Commands::ShowProgress { json }) => {
            with_tracker(&settings, |t| cmd::cmd_show_progress(t, json))?
        }
    }

    Ok(())
}

/// Open the database and run `f` against a tracker wired to the configured
/// audio cue.
fn with_tracker<F>(settings: &Settings, f: F) -> Result<()>
where
    F: FnOnce(&Tracker<'_>) -> Result<()>,
{
    let store = TaskStore::open(&settings.db_path)?;
    let chime = audio::chime(settings.sound);
    let tracker = Tracker::new(store, chime.as_ref());
    f(&tracker)
}
