//! Relay state machine: {OFF, ON} over one physical pin.
//!
//! The physical pin is the source of truth for the current state. Every
//! transition is guarded (switching to the state the relay is already in
//! does nothing) and keeps the `state` table in step: the session row is
//! written before the pin changes on turn-on and cleared before the pin
//! changes on turn-off. A store failure is logged and the pin still moves.

use crate::core::clock::Clock;
use crate::db::store::Store;
use crate::hw::{PinDriver, RelayPin, RelayState};
use std::sync::Arc;
use tracing::{info, warn};

/// Who asked for a transition. Recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Manual,
    Program,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Manual => "manual",
            Source::Program => "program",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The pin was driven to the new state.
    Switched(RelayState),
    /// The relay was already in the requested state.
    Unchanged(RelayState),
}

impl Transition {
    pub fn state(&self) -> RelayState {
        match self {
            Transition::Switched(s) | Transition::Unchanged(s) => *s,
        }
    }

    pub fn switched(&self) -> bool {
        matches!(self, Transition::Switched(_))
    }
}

pub struct Relay<P: PinDriver = Box<dyn PinDriver>> {
    pin: RelayPin<P>,
    store: Store,
    clock: Arc<dyn Clock>,
}

impl<P: PinDriver> Relay<P> {
    pub fn new(pin: RelayPin<P>, store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { pin, store, clock }
    }

    pub fn state(&self) -> RelayState {
        self.pin.read_logical_state()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn turn_on(&mut self, source: Source) -> Transition {
        if self.state().is_on() {
            return Transition::Unchanged(RelayState::On);
        }

        let on_since = self.clock.now().timestamp();
        if let Err(e) = self.store.open_session(on_since) {
            warn!(error = %e, "could not record on-session, switching anyway");
        }

        self.pin.set_logical_on();
        info!(source = source.as_str(), on_since, "relay switched ON");
        self.store
            .audit("on", source.as_str(), &format!("Relay switched ON at {on_since}"));

        Transition::Switched(RelayState::On)
    }

    pub fn turn_off(&mut self, source: Source) -> Transition {
        if !self.state().is_on() {
            return Transition::Unchanged(RelayState::Off);
        }

        if let Err(e) = self.store.clear_session() {
            warn!(error = %e, "could not clear on-session, switching anyway");
        }

        self.pin.set_logical_off();
        let at = self.clock.now().timestamp();
        info!(source = source.as_str(), at, "relay switched OFF");
        self.store
            .audit("off", source.as_str(), &format!("Relay switched OFF at {at}"));

        Transition::Switched(RelayState::Off)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::db::models::OnSession;
    use crate::hw::{Level, SimulatedPin};
    use chrono::{Local, TimeZone};
    use std::time::Duration;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        raw: SimulatedPin,
        clock: Arc<ManualClock>,
        relay: Relay<SimulatedPin>,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("relay.sqlite").to_string_lossy().to_string());
        store.ensure_schema().unwrap();

        let raw = SimulatedPin::new();
        let clock = Arc::new(ManualClock::new(
            Local.with_ymd_and_hms(2026, 5, 4, 12, 0, 0).unwrap(),
        ));
        let relay = Relay::new(RelayPin::initialize(raw.clone()), store, clock.clone());

        Fixture {
            _dir: dir,
            raw,
            clock,
            relay,
        }
    }

    fn audit_count(store: &Store, operation: &str) -> i64 {
        store
            .open()
            .unwrap()
            .conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = ?1",
                [operation],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test]
    fn starts_off_after_initialize() {
        let f = fixture();
        assert_eq!(f.relay.state(), RelayState::Off);
        assert_eq!(f.relay.store().current_session().unwrap(), None);
    }

    #[test]
    fn turn_on_twice_opens_one_session_and_writes_once() {
        let mut f = fixture();
        let writes_before = f.raw.writes().len();

        assert_eq!(
            f.relay.turn_on(Source::Manual),
            Transition::Switched(RelayState::On)
        );
        f.clock.advance(Duration::from_secs(30));
        assert_eq!(
            f.relay.turn_on(Source::Manual),
            Transition::Unchanged(RelayState::On)
        );

        assert_eq!(f.raw.writes().len(), writes_before + 1);
        assert_eq!(f.raw.level(), Level::Low);

        let expected = Local.with_ymd_and_hms(2026, 5, 4, 12, 0, 0).unwrap();
        assert_eq!(
            f.relay.store().current_session().unwrap(),
            Some(OnSession {
                on_since: expected.timestamp()
            })
        );
        assert_eq!(audit_count(f.relay.store(), "on"), 1);
    }

    #[test]
    fn turn_off_clears_session() {
        let mut f = fixture();
        f.relay.turn_on(Source::Manual);
        assert!(f.relay.turn_off(Source::Manual).switched());

        assert_eq!(f.relay.state(), RelayState::Off);
        assert_eq!(f.raw.level(), Level::High);
        assert_eq!(f.relay.store().current_session().unwrap(), None);
    }

    #[test]
    fn turn_off_when_off_leaves_store_alone() {
        let mut f = fixture();
        f.relay.turn_on(Source::Manual);
        f.relay.turn_off(Source::Manual);
        let writes = f.raw.writes().len();

        assert_eq!(
            f.relay.turn_off(Source::Manual),
            Transition::Unchanged(RelayState::Off)
        );
        assert_eq!(f.raw.writes().len(), writes);
        assert_eq!(f.relay.store().current_session().unwrap(), None);
        assert_eq!(audit_count(f.relay.store(), "off"), 1);
    }

    #[test]
    fn pin_moves_even_when_store_is_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing").join("relay.sqlite");
        let raw = SimulatedPin::new();
        let clock = Arc::new(ManualClock::new(Local::now()));
        let mut relay = Relay::new(
            RelayPin::initialize(raw.clone()),
            Store::new(missing.to_string_lossy().to_string()),
            clock,
        );

        assert!(relay.turn_on(Source::Manual).switched());
        assert_eq!(raw.level(), Level::Low);
        assert!(relay.turn_off(Source::Manual).switched());
        assert_eq!(raw.level(), Level::High);
    }
}
