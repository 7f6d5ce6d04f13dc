//! relayctl library root.
//! Exposes the CLI parser, the high-level run() function and the relay,
//! scheduler, persistence and control-service modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod hw;
pub mod logging;
pub mod ui;
pub mod utils;
pub mod web;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli, cfg),
        Commands::Schedule => cli::commands::schedule::handle(cli, cfg),
        Commands::Serve { .. } => cli::commands::serve::handle(cli, cfg),
        Commands::Status | Commands::On | Commands::Off => cli::commands::relay::handle(cli, cfg),
        Commands::Runs { .. } => cli::commands::runs::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Config { .. } => cli::commands::config::handle(cli, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    logging::init(cli.command.default_log_level());

    // 2️⃣ load config once
    let mut cfg = Config::load(&cli.config_path())?;

    // 3️⃣ command-line DB override
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    // 4️⃣ hand everything to the dispatcher
    dispatch(&cli, &cfg)
}
