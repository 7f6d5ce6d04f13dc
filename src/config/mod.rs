use crate::core::program::{DailyProgram, Step, default_steps};
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use crate::utils::time::parse_time;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// BCM number of the relay pin.
    #[serde(default = "default_pin")]
    pub pin: u8,
    /// Listen address of the control service.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Daily trigger times, `HH:MM` local time.
    #[serde(default = "default_triggers")]
    pub triggers: Vec<String>,
    #[serde(default = "default_steps")]
    pub program: Vec<Step>,
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_pin() -> u8 {
    3
}
fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}
fn default_triggers() -> Vec<String> {
    vec!["06:00".to_string(), "15:00".to_string()]
}
fn default_poll_secs() -> u64 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            pin: default_pin(),
            bind: default_bind(),
            triggers: default_triggers(),
            program: default_steps(),
            poll_secs: default_poll_secs(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory
    pub fn config_dir() -> PathBuf {
        let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".relayctl")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("relayctl.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("relayctl.sqlite")
    }

    /// Load configuration from `path`, or return defaults if the file does not exist.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.trigger_times()?;
        if self.program.is_empty() {
            return Err(AppError::Config("program must contain at least one step".into()));
        }
        if self.poll_secs == 0 {
            return Err(AppError::Config("poll_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn trigger_times(&self) -> AppResult<Vec<NaiveTime>> {
        self.triggers
            .iter()
            .map(|t| parse_time(t).ok_or_else(|| AppError::InvalidTime(t.clone())))
            .collect()
    }

    pub fn program(&self) -> DailyProgram {
        DailyProgram::new(self.program.clone())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_secs)
    }

    /// Database path with `~` expanded.
    pub fn database_path(&self) -> String {
        expand_tilde(&self.database).to_string_lossy().to_string()
    }

    /// Write the configuration file, creating its directory if needed.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }
}
