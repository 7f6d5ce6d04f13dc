//! Tracing setup shared by all subcommands.
//!
//! Output goes to stderr so `runs --json` keeps a clean stdout.
//! `RUST_LOG` overrides the per-command default level.

use tracing_subscriber::EnvFilter;

pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
