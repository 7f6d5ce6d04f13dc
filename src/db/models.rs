//! Database row models for scheduled runs and the open "on" session.
//! Timestamps are Unix seconds.

use serde::Serialize;

/// One completed execution of the daily program. Never updated or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduledRun {
    pub start: i64,
    pub end: i64,
}

impl ScheduledRun {
    pub fn duration_secs(&self) -> i64 {
        self.end - self.start
    }
}

/// The currently open manual "on" period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OnSession {
    pub on_since: i64,
}
