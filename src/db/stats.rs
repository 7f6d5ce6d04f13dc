use crate::db::pool::DbPool;
use crate::db::queries::{count_runs, load_on_since};
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::time::format_timestamp;
use std::fs;

pub fn print_db_info(pool: &DbPool, db_path: &str) -> crate::errors::AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);

    //
    // 2) TOTAL RUNS
    //
    let count = count_runs(&pool.conn)?;
    println!("{}• Program runs:{} {}{}{}", CYAN, RESET, GREEN, count, RESET);

    //
    // 3) RUN RANGE
    //
    let first: Option<i64> = pool
        .conn
        .query_row("SELECT MIN(start) FROM cron", [], |row| row.get(0))?;
    let last: Option<i64> = pool
        .conn
        .query_row("SELECT MAX(start) FROM cron", [], |row| row.get(0))?;

    let fmt = |ts: Option<i64>| {
        ts.map(format_timestamp)
            .unwrap_or_else(|| format!("{GREY}--{RESET}"))
    };

    println!("{}• Run range:{}", CYAN, RESET);
    println!("    from: {}", fmt(first));
    println!("    to:   {}", fmt(last));

    //
    // 4) OPEN SESSION
    //
    let on_since = load_on_since(&pool.conn)?;
    println!("{}• On since:{} {}", CYAN, RESET, fmt(on_since));

    //
    // 5) AUDIT LOG
    //
    let entries: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM log", [], |row| row.get(0))?;
    println!("{}• Log entries:{} {}", CYAN, RESET, entries);

    println!();
    Ok(())
}
