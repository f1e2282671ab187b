//! Configuration for taskquest.
//!
//! Settings are layered file → environment → CLI. The file lives at
//! `<config_dir>/taskquest/config.toml` unless `--config` or
//! `TASKQUEST_CONFIG` points elsewhere; a missing file means defaults.
//!
//! # Configuration File Format
//!
//! ```toml
//! [storage]
//! db_path = "/home/me/.local/share/taskquest/tasks.db"
//!
//! [feedback]
//! sound = true
//!
//! [timer]
//! tick_ms = 1000
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "taskquest";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSection {
    /// Database file; defaults to `<data_dir>/taskquest/tasks.db`
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackSection {
    /// Ring the terminal bell on completion and level-up
    #[serde(default = "default_sound")]
    pub sound: bool,
}

fn default_sound() -> bool {
    true
}

impl Default for FeedbackSection {
    fn default() -> Self {
        Self {
            sound: default_sound(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSection {
    /// Countdown refresh interval in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_tick_ms() -> u64 {
    1000
}

impl Default for TimerSection {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub feedback: FeedbackSection,
    #[serde(default)]
    pub timer: TimerSection,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config.toml")
    }

    /// Load `path` if it exists, otherwise return defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Return human-readable warnings for suspicious values.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.timer.tick_ms == 0 {
            warnings.push("timer.tick_ms is 0; the countdown will busy-loop".to_string());
        } else if self.timer.tick_ms > 60_000 {
            warnings.push(format!(
                "timer.tick_ms = {} refreshes less than once a minute",
                self.timer.tick_ms
            ));
        }
        if let Some(db) = &self.storage.db_path
            && db.as_os_str().is_empty()
        {
            warnings.push("storage.db_path is empty; the default location is used".to_string());
        }
        warnings
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasks.db")
}

/// Values given on the command line (or through clap's env fallback).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub no_sound: bool,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config_path: PathBuf,
    pub db_path: PathBuf,
    pub sound: bool,
    pub tick: Duration,
    pub file: ConfigFile,
}

impl Settings {
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        let sound_env = std::env::var("TASKQUEST_SOUND").ok();
        Self::resolve_with(overrides, sound_env.as_deref())
    }

    fn resolve_with(overrides: &Overrides, sound_env: Option<&str>) -> Result<Self> {
        let config_path = overrides
            .config_path
            .clone()
            .unwrap_or_else(default_config_path);
        let file = ConfigFile::load_or_default(&config_path)?;
        for warning in file.validate() {
            tracing::warn!(%warning, "config");
        }

        let db_path = overrides
            .db_path
            .clone()
            .or_else(|| {
                file.storage
                    .db_path
                    .clone()
                    .filter(|p| !p.as_os_str().is_empty())
            })
            .unwrap_or_else(default_db_path);

        let sound = !overrides.no_sound
            && match sound_env {
                Some(v) => !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "off"),
                None => file.feedback.sound,
            };

        tracing::debug!(
            config = %config_path.display(),
            db = %db_path.display(),
            sound,
            "resolved settings"
        );

        Ok(Self {
            config_path,
            db_path,
            sound,
            tick: Duration::from_millis(file.timer.tick_ms.max(1)),
            file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_empty_uses_defaults() {
        let cfg = ConfigFile::parse("").unwrap();
        assert!(cfg.storage.db_path.is_none());
        assert!(cfg.feedback.sound);
        assert_eq!(cfg.timer.tick_ms, 1000);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn test_parse_full_file() {
        let cfg = ConfigFile::parse(
            r#"
            [storage]
            db_path = "/tmp/quest.db"

            [feedback]
            sound = false

            [timer]
            tick_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(cfg.storage.db_path, Some(PathBuf::from("/tmp/quest.db")));
        assert!(!cfg.feedback.sound);
        assert_eq!(cfg.timer.tick_ms, 250);
    }

    #[test]
    fn test_parse_rejects_bad_types() {
        assert!(ConfigFile::parse("[feedback]\nsound = \"loud\"").is_err());
    }

    #[test]
    fn test_validate_flags_zero_tick() {
        let mut cfg = ConfigFile::default();
        cfg.timer.tick_ms = 0;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("tick_ms"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub/config.toml");
        let mut cfg = ConfigFile::default();
        cfg.feedback.sound = false;
        cfg.save(&path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert!(!loaded.feedback.sound);
        assert_eq!(loaded.timer.tick_ms, 1000);
    }

    #[test]
    fn test_resolve_prefers_cli_db_over_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[storage]\ndb_path = \"/from/file.db\"\n").unwrap();

        let from_file = Settings::resolve_with(
            &Overrides {
                config_path: Some(config_path.clone()),
                ..Default::default()
            },
            None,
        )
        .unwrap();
        assert_eq!(from_file.db_path, PathBuf::from("/from/file.db"));

        let from_cli = Settings::resolve_with(
            &Overrides {
                config_path: Some(config_path),
                db_path: Some(PathBuf::from("/from/cli.db")),
                no_sound: false,
            },
            None,
        )
        .unwrap();
        assert_eq!(from_cli.db_path, PathBuf::from("/from/cli.db"));
    }

    #[test]
    fn test_resolve_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::resolve_with(
            &Overrides {
                config_path: Some(dir.path().join("absent.toml")),
                ..Default::default()
            },
            None,
        )
        .unwrap();
        assert_eq!(settings.db_path, default_db_path());
        assert!(settings.sound);
        assert_eq!(settings.tick, Duration::from_millis(1000));
    }

    #[test]
    fn test_sound_layering() {
        let dir = tempdir().unwrap();
        let overrides = Overrides {
            config_path: Some(dir.path().join("absent.toml")),
            ..Default::default()
        };
        assert!(!Settings::resolve_with(&overrides, Some("0")).unwrap().sound);
        assert!(!Settings::resolve_with(&overrides, Some("false")).unwrap().sound);
        assert!(Settings::resolve_with(&overrides, Some("1")).unwrap().sound);

        let muted = Overrides {
            no_sound: true,
            ..overrides
        };
        assert!(!Settings::resolve_with(&muted, Some("1")).unwrap().sound);
    }
}
