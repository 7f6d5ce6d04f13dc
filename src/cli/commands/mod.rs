pub mod config;
pub mod db;
pub mod init;
pub mod log;
pub mod relay;
pub mod runs;
pub mod schedule;
pub mod serve;

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::relay::Relay;
use crate::db::store::Store;
use crate::errors::AppResult;
use crate::hw::{Access, RelayPin, open_pin};
use std::sync::Arc;

/// How a process takes over the relay pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Startup {
    /// Long-running process: reset the pin and force it OFF.
    Initialize,
    /// One-shot switch: claim the pin but keep whatever level it has.
    Attach,
}

/// Claim the pin and wire it to the store. A pin that cannot be claimed is
/// fatal: nothing is served or scheduled without it.
pub fn build_relay(cli: &Cli, cfg: &Config, startup: Startup) -> AppResult<Relay> {
    let store = Store::new(cfg.database_path());
    store.ensure_schema()?;

    let driver = open_pin(cfg.pin, cli.simulate, Access::Drive)?;
    let pin = match startup {
        Startup::Initialize => RelayPin::initialize(driver),
        Startup::Attach => RelayPin::attach(driver),
    };

    Ok(Relay::new(pin, store, Arc::new(SystemClock)))
}
