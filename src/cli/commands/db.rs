use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::{check, stats};
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        check: run_check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    let db_path = cfg.database_path();
    let pool = DbPool::new(&db_path)?;

    if *show_info {
        stats::print_db_info(&pool, &db_path)?;
    }

    if *run_check {
        info("Checking database…");
        let issues = check::check(&pool.conn, Local::now().timestamp())?;
        if issues.is_empty() {
            success("Database check passed.");
        }
        for issue in &issues {
            warning(issue);
        }
    }

    if *vacuum {
        info("Running VACUUM…");
        pool.conn.execute_batch("VACUUM;")?;
        success("Vacuum completed.");
    }

    Ok(())
}
