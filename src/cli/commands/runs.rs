use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::store::Store;
use crate::errors::{AppError, AppResult};
use crate::utils::colors::{GREY, RESET};
use crate::utils::time::{format_seconds, format_timestamp};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Runs { limit, json } = cmd {
        let store = Store::new(cfg.database_path());
        let runs = store.latest_runs(*limit)?;

        if *json {
            let body = serde_json::json!({ "latest_runs": runs });
            let text =
                serde_json::to_string_pretty(&body).map_err(|e| AppError::Other(e.to_string()))?;
            println!("{}", text);
            return Ok(());
        }

        if runs.is_empty() {
            println!("{}No program runs recorded.{}", GREY, RESET);
            return Ok(());
        }

        println!("{:<20} {:<20} {:>8}", "START", "END", "LENGTH");
        for run in runs {
            println!(
                "{:<20} {:<20} {:>8}",
                format_timestamp(run.start),
                format_timestamp(run.end),
                format_seconds(run.duration_secs())
            );
        }
    }

    Ok(())
}
