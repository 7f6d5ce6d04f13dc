use crate::db::log::ttlog;
use rusqlite::{Connection, Result};
use tracing::{info, warn};

/// Check if a table exists.
fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1")?;
    stmt.exists([name])
}

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Create the append-only `cron` table (completed program runs).
///
/// Older installs created it as `cron (start INT, end INT)`; the columns are
/// compatible, only the index is added.
fn ensure_cron_table(conn: &Connection) -> Result<bool> {
    let existed = table_exists(conn, "cron")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS cron (
            start INTEGER NOT NULL,
            end   INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_cron_start ON cron(start);
        "#,
    )?;

    Ok(!existed)
}

/// Create the zero-or-one row `state` table (open "on" session).
fn ensure_state_table(conn: &Connection) -> Result<bool> {
    let existed = table_exists(conn, "state")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS state (
            on_since INTEGER NOT NULL
        );
        "#,
    )?;

    Ok(!existed)
}

/// Keep only the newest session row if an older writer left several.
fn collapse_state_rows(conn: &Connection) -> Result<usize> {
    conn.execute(
        "DELETE FROM state
         WHERE rowid NOT IN (SELECT rowid FROM state ORDER BY on_since DESC LIMIT 1)",
        [],
    )
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db(). Every step is idempotent, so both processes call
/// it at startup.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Program history
    if ensure_cron_table(conn)? {
        info!(table = "cron", "created table");
        ttlog_quiet(conn, "migration_applied", "cron", "Created cron table");
    }

    // 3) Session marker
    if ensure_state_table(conn)? {
        info!(table = "state", "created table");
        ttlog_quiet(conn, "migration_applied", "state", "Created state table");
    }

    let removed = collapse_state_rows(conn)?;
    if removed > 0 {
        warn!(removed, "removed stale session rows from state table");
        ttlog_quiet(
            conn,
            "migration_applied",
            "state",
            &format!("Collapsed state table, removed {removed} stale row(s)"),
        );
    }

    Ok(())
}

fn ttlog_quiet(conn: &Connection, operation: &str, target: &str, message: &str) {
    if let Err(e) = ttlog(conn, operation, target, message) {
        warn!(error = %e, "failed to write migration log entry");
    }
}
