//! Shared persistence handle.
//!
//! Both processes use the same SQLite file. Nothing is held open between
//! operations: every call opens its own connection and drops it on return.

use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::models::{OnSession, ScheduledRun};
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;

#[derive(Debug, Clone)]
pub struct Store {
    path: String,
}

impl Store {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn open(&self) -> AppResult<DbPool> {
        Ok(DbPool::new(&self.path)?)
    }

    /// Create missing tables. Safe to call from every process at startup.
    pub fn ensure_schema(&self) -> AppResult<()> {
        let pool = self.open()?;
        init_db(&pool.conn)
    }

    pub fn open_session(&self, on_since: i64) -> AppResult<()> {
        let mut pool = self.open()?;
        queries::open_session(&mut pool.conn, on_since)
    }

    pub fn clear_session(&self) -> AppResult<()> {
        let pool = self.open()?;
        queries::clear_session(&pool.conn)
    }

    pub fn current_session(&self) -> AppResult<Option<OnSession>> {
        let pool = self.open()?;
        Ok(queries::load_on_since(&pool.conn)?.map(|on_since| OnSession { on_since }))
    }

    pub fn record_run(&self, run: &ScheduledRun) -> AppResult<()> {
        let pool = self.open()?;
        queries::insert_run(&pool.conn, run)
    }

    pub fn latest_runs(&self, limit: usize) -> AppResult<Vec<ScheduledRun>> {
        let pool = self.open()?;
        queries::load_latest_runs(&pool.conn, limit)
    }

    /// Best-effort audit entry: a failure is logged and otherwise ignored.
    pub fn audit(&self, operation: &str, target: &str, message: &str) {
        let result = self
            .open()
            .and_then(|pool| ttlog(&pool.conn, operation, target, message));

        if let Err(e) = result {
            tracing::warn!(
                error = %e,
                operation,
                audit_target = target,
                "failed to write audit log entry"
            );
        }
    }
}
