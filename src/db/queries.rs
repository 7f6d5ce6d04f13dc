use crate::db::models::ScheduledRun;
use crate::errors::AppResult;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_run(row: &Row) -> Result<ScheduledRun> {
    Ok(ScheduledRun {
        start: row.get("start")?,
        end: row.get("end")?,
    })
}

pub fn insert_run(conn: &Connection, run: &ScheduledRun) -> AppResult<()> {
    conn.execute(
        "INSERT INTO cron (start, end) VALUES (?1, ?2)",
        params![run.start, run.end],
    )?;
    Ok(())
}

/// Most recent runs first.
pub fn load_latest_runs(conn: &Connection, limit: usize) -> AppResult<Vec<ScheduledRun>> {
    let mut stmt = conn.prepare("SELECT start, end FROM cron ORDER BY start DESC LIMIT ?1")?;

    let rows = stmt.query_map([limit as i64], map_run)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_runs(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM cron", [], |row| row.get(0))
}

/// Replace whatever session row exists with a new one.
pub fn open_session(conn: &mut Connection, on_since: i64) -> AppResult<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM state", [])?;
    tx.execute("INSERT INTO state (on_since) VALUES (?1)", [on_since])?;
    tx.commit()?;
    Ok(())
}

pub fn clear_session(conn: &Connection) -> AppResult<()> {
    conn.execute("DELETE FROM state", [])?;
    Ok(())
}

pub fn load_on_since(conn: &Connection) -> AppResult<Option<i64>> {
    let on_since = conn
        .query_row(
            "SELECT on_since FROM state ORDER BY on_since DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(on_since)
}
