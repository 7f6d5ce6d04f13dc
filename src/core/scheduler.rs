//! Time-triggered program runner.
//!
//! Each trigger is a time of day with its own `next_run`. The loop wakes
//! every `poll` interval, runs the program for each trigger whose `next_run`
//! has passed, then re-arms that trigger to its next future occurrence.
//! A trigger missed while the process was down is not caught up, and a
//! trigger that passes while a run is in progress fires once, after it.

use crate::core::clock::Clock;
use crate::core::program::DailyProgram;
use crate::core::relay::Relay;
use crate::db::models::ScheduledRun;
use crate::hw::PinDriver;
use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub at: NaiveTime,
    pub next_run: NaiveDateTime,
}

impl Trigger {
    fn armed(at: NaiveTime, now: NaiveDateTime) -> Self {
        Self {
            at,
            next_run: next_occurrence(at, now),
        }
    }

    fn is_due(&self, now: NaiveDateTime) -> bool {
        now >= self.next_run
    }
}

/// First moment strictly after `now` whose time of day is `at`.
pub fn next_occurrence(at: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + TimeDelta::days(1)
    }
}

pub struct Scheduler<P: PinDriver = Box<dyn PinDriver>> {
    relay: Relay<P>,
    program: DailyProgram,
    triggers: Vec<Trigger>,
    poll: Duration,
}

impl<P: PinDriver> Scheduler<P> {
    pub fn new(
        relay: Relay<P>,
        program: DailyProgram,
        times: &[NaiveTime],
        poll: Duration,
    ) -> Self {
        let now = relay.clock().now().naive_local();
        let mut times = times.to_vec();
        times.sort();
        times.dedup();
        let triggers = times.into_iter().map(|at| Trigger::armed(at, now)).collect();

        Self {
            relay,
            program,
            triggers,
            poll,
        }
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn relay(&self) -> &Relay<P> {
        &self.relay
    }

    pub fn next_run(&self) -> Option<NaiveDateTime> {
        self.triggers.iter().map(|t| t.next_run).min()
    }

    fn clock(&self) -> Arc<dyn Clock> {
        self.relay.clock().clone()
    }

    /// Run the program once for every due trigger, earliest first.
    ///
    /// Due triggers are re-checked after each run, so one that came due
    /// while the program was running still fires. Returns the runs that
    /// completed and were recorded.
    pub fn run_pending(&mut self) -> Vec<ScheduledRun> {
        let clock = self.clock();
        let mut completed = Vec::new();

        while let Some(i) = self.earliest_due(clock.now().naive_local()) {
            let at = self.triggers[i].at;
            info!(trigger = %at.format("%H:%M"), "starting daily program");

            match self.program.run(&mut self.relay) {
                Ok(run) => {
                    info!(
                        trigger = %at.format("%H:%M"),
                        start = run.start,
                        end = run.end,
                        "daily program completed"
                    );
                    completed.push(run);
                }
                Err(e) => {
                    error!(trigger = %at.format("%H:%M"), error = %e, "daily program run dropped");
                }
            }

            self.triggers[i].next_run = next_occurrence(at, clock.now().naive_local());
        }

        completed
    }

    fn earliest_due(&self, now: NaiveDateTime) -> Option<usize> {
        (0..self.triggers.len())
            .filter(|&i| self.triggers[i].is_due(now))
            .min_by_key(|&i| self.triggers[i].next_run)
    }

    /// Poll until `deadline` (local wall-clock time).
    pub fn run_until(&mut self, deadline: NaiveDateTime) -> Vec<ScheduledRun> {
        let clock = self.clock();
        let mut completed = Vec::new();

        while clock.now().naive_local() < deadline {
            completed.extend(self.run_pending());
            clock.sleep(self.poll);
        }

        completed
    }

    pub fn run_forever(&mut self) -> ! {
        let clock = self.clock();
        if let Some(next) = self.next_run() {
            info!(next_run = %next, "scheduler started");
        }

        loop {
            self.run_pending();
            clock.sleep(self.poll);
        }
    }
}
