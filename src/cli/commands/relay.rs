//! One-shot `status`, `on` and `off` commands.
//!
//! None of them reset the pin, so asking for the state never switches a
//! running relay off. `status` does not even claim it.

use super::{Startup, build_relay};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::relay::Source;
use crate::db::store::Store;
use crate::errors::AppResult;
use crate::hw::{Access, RelayState, observe_state, open_pin};
use crate::ui::messages::{info, relay_state, success};
use crate::utils::time::format_timestamp;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let (state, store) = match cli.command {
        Commands::On | Commands::Off => {
            let mut relay = build_relay(cli, cfg, Startup::Attach)?;
            let t = if matches!(cli.command, Commands::On) {
                relay.turn_on(Source::Manual)
            } else {
                relay.turn_off(Source::Manual)
            };

            if t.switched() {
                success(format!("Relay switched {}", t.state()));
            } else {
                info(format!("Relay already {}", t.state()));
            }
            (relay.state(), relay.store().clone())
        }
        _ => status(cli, cfg)?,
    };

    relay_state(state);

    match store.current_session() {
        Ok(Some(session)) => println!("⏱️  On since: {}", format_timestamp(session.on_since)),
        Ok(None) => {}
        Err(e) => eprintln!("⚠️ Could not read on-session: {}", e),
    }

    Ok(())
}

fn status(cli: &Cli, cfg: &Config) -> AppResult<(RelayState, Store)> {
    let store = Store::new(cfg.database_path());
    store.ensure_schema()?;

    let driver = open_pin(cfg.pin, cli.simulate, Access::Observe)?;
    Ok((observe_state(&driver), store))
}
