//! Consistency checks behind `db --check`.

use crate::errors::AppResult;
use rusqlite::Connection;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// `PRAGMA integrity_check` reported something other than `ok`.
    Integrity(String),
    /// More than one open on-session row.
    SessionRows(i64),
    /// An on-session that starts after `now`.
    SessionInFuture(i64),
    /// Program runs that end before they start.
    InvertedRuns(i64),
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::Integrity(msg) => write!(f, "integrity check failed: {msg}"),
            Issue::SessionRows(n) => write!(f, "state table holds {n} session rows, expected at most 1"),
            Issue::SessionInFuture(ts) => write!(f, "on-session starts in the future ({ts})"),
            Issue::InvertedRuns(n) => write!(f, "{n} program run(s) end before they start"),
        }
    }
}

pub fn check(conn: &Connection, now: i64) -> AppResult<Vec<Issue>> {
    let mut issues = Vec::new();

    let integrity: String = conn.query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
    if integrity != "ok" {
        issues.push(Issue::Integrity(integrity));
    }

    let sessions: i64 = conn.query_row("SELECT COUNT(*) FROM state", [], |row| row.get(0))?;
    if sessions > 1 {
        issues.push(Issue::SessionRows(sessions));
    }

    let newest: Option<i64> =
        conn.query_row("SELECT MAX(on_since) FROM state", [], |row| row.get(0))?;
    if let Some(ts) = newest
        && ts > now
    {
        issues.push(Issue::SessionInFuture(ts));
    }

    let inverted: i64 =
        conn.query_row("SELECT COUNT(*) FROM cron WHERE end < start", [], |row| row.get(0))?;
    if inverted > 0 {
        issues.push(Issue::InvertedRuns(inverted));
    }

    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate::run_pending_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn fresh_database_is_clean() {
        assert!(check(&conn(), 1_000).unwrap().is_empty());
    }

    #[test]
    fn reports_bad_relay_rows() {
        let conn = conn();
        conn.execute_batch(
            "INSERT INTO state (on_since) VALUES (100), (5000);
             INSERT INTO cron (start, end) VALUES (10, 730), (900, 200);",
        )
        .unwrap();

        assert_eq!(
            check(&conn, 1_000).unwrap(),
            vec![
                Issue::SessionRows(2),
                Issue::SessionInFuture(5000),
                Issue::InvertedRuns(1),
            ]
        );
    }
}
