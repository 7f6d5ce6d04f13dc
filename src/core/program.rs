//! The daily on/off program.
//!
//! A program is a fixed list of steps, each switching the relay and then
//! holding for a number of seconds. It runs synchronously: the caller is
//! blocked until the last step finishes. Only a complete run is written to
//! the `cron` table.

use crate::core::relay::{Relay, Source};
use crate::db::models::ScheduledRun;
use crate::errors::AppResult;
use crate::hw::PinDriver;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Length of each hold in the stock program.
pub const STEP_SECS: u64 = 3 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub action: Action,
    #[serde(default)]
    pub hold_secs: u64,
}

impl Step {
    pub const fn new(action: Action, hold_secs: u64) -> Self {
        Self { action, hold_secs }
    }
}

/// on 3 min, off 3 min, on 3 min, off 3 min.
pub fn default_steps() -> Vec<Step> {
    vec![
        Step::new(Action::On, STEP_SECS),
        Step::new(Action::Off, STEP_SECS),
        Step::new(Action::On, STEP_SECS),
        Step::new(Action::Off, STEP_SECS),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyProgram {
    steps: Vec<Step>,
}

impl Default for DailyProgram {
    fn default() -> Self {
        Self::new(default_steps())
    }
}

impl DailyProgram {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn total_secs(&self) -> u64 {
        self.steps.iter().map(|s| s.hold_secs).sum()
    }

    /// Execute every step, then append the run to the store.
    pub fn run<P: PinDriver>(&self, relay: &mut Relay<P>) -> AppResult<ScheduledRun> {
        let clock = relay.clock().clone();
        let start = clock.now().timestamp();

        for step in &self.steps {
            match step.action {
                Action::On => relay.turn_on(Source::Program),
                Action::Off => relay.turn_off(Source::Program),
            };
            if step.hold_secs > 0 {
                clock.sleep(Duration::from_secs(step.hold_secs));
            }
        }

        let run = ScheduledRun {
            start,
            end: clock.now().timestamp(),
        };

        relay.store().record_run(&run)?;
        relay.store().audit(
            "program",
            "cron",
            &format!("Program completed ({}s)", run.duration_secs()),
        );

        Ok(run)
    }
}
