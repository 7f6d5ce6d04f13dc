use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for relayctl
/// Drives a relay on one GPIO pin: daily program, web panel, SQLite audit log
#[derive(Parser)]
#[command(
    name = "relayctl",
    version = env!("CARGO_PKG_VERSION"),
    about = "Relay controller: daily on/off program, web control panel and audit log on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Use this configuration file instead of ~/.relayctl/relayctl.conf
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config_file: Option<String>,

    /// Drive an in-memory pin instead of the GPIO hardware
    #[arg(global = true, long = "simulate")]
    pub simulate: bool,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config_file
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(Config::config_file)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Run the daily program scheduler (long-running)
    Schedule,

    /// Run the web control service (long-running)
    Serve {
        /// Listen address, overrides `bind` from the configuration
        #[arg(long = "bind", value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Show the current relay state
    Status,

    /// Switch the relay on (no-op if already on)
    On,

    /// Switch the relay off (no-op if already off)
    Off,

    /// List the latest completed program runs
    Runs {
        #[arg(long, short = 'n', default_value_t = 5, help = "Number of runs to show")]
        limit: usize,

        #[arg(long = "json", help = "Print the runs as JSON")]
        json: bool,
    },

    /// Print the internal audit log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "limit", help = "Only the newest N rows")]
        limit: Option<usize>,
    },

    /// Manage the database (integrity checks, vacuum, info)
    Db {
        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },
}

impl Commands {
    /// Long-running services log at info, one-shot commands only warn.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Commands::Schedule | Commands::Serve { .. } => "info",
            _ => "warn",
        }
    }
}
