//! Configuration view and setup commands — `taskquest config`.

use anyhow::Result;

use super::super::ConfigCommands;
use taskquest::config::{ConfigFile, Settings};

pub fn cmd_config(settings: &Settings, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = &settings.config_path;

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Taskquest Configuration");
            println!("=======================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No config file at {} (using defaults)", config_path.display());
            }
            println!();

            let file = &settings.file;
            println!("[storage]");
            match &file.storage.db_path {
                Some(path) => println!("  db_path = \"{}\"", path.display()),
                None => println!("  db_path = (default)"),
            }
            println!();
            println!("[feedback]");
            println!("  sound = {}", file.feedback.sound);
            println!();
            println!("[timer]");
            println!("  tick_ms = {}", file.timer.tick_ms);
            println!();

            println!("Effective values (with env/CLI overrides):");
            println!("  db_path = \"{}\"", settings.db_path.display());
            println!("  sound = {}", settings.sound);
            println!();

            let warnings = file.validate();
            if !warnings.is_empty() {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
                println!();
            }
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("config.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            ConfigFile::default().save(config_path)?;

            println!("Created config.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [storage] db_path");
            println!("  - [feedback] sound");
            println!("  - [timer] tick_ms");
            println!();
        }
        Some(ConfigCommands::Path) => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}
