use super::{Startup, build_relay};
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::scheduler::Scheduler;
use crate::errors::AppResult;
use tracing::info;

/// Handle the `schedule` command: initialize the pin (forcing the relay
/// OFF), then poll the daily triggers until the process is killed.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let times = cfg.trigger_times()?;
    let relay = build_relay(cli, cfg, Startup::Initialize)?;
    relay
        .store()
        .audit("init", "scheduler", &format!("Scheduler started on GPIO{}", cfg.pin));

    info!(
        pin = cfg.pin,
        triggers = ?cfg.triggers,
        program_secs = cfg.program().total_secs(),
        "relay initialized OFF"
    );

    let mut scheduler = Scheduler::new(relay, cfg.program(), &times, cfg.poll_interval());
    scheduler.run_forever()
}
