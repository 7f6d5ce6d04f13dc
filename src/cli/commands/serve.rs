use super::{Startup, build_relay};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::web;
use tracing::info;

/// Handle the `serve` command: initialize the pin (forcing the relay OFF),
/// then run the HTTP control service.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let bind = match &cli.command {
        Commands::Serve { bind: Some(b) } => b.clone(),
        _ => cfg.bind.clone(),
    };

    let relay = build_relay(cli, cfg, Startup::Initialize)?;
    relay
        .store()
        .audit("init", "control", &format!("Control service started on GPIO{}", cfg.pin));
    info!(pin = cfg.pin, "relay initialized OFF");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(web::serve(&bind, relay))
}
