//! Scheduler and control service as two independent relays over one pin
//! and one database file, coordinated only through the pin level and the
//! store.

use chrono::{Local, TimeZone};
use relayctl::core::clock::ManualClock;
use relayctl::core::program::{Action, DailyProgram, Step};
use relayctl::core::relay::{Relay, Source, Transition};
use relayctl::db::store::Store;
use relayctl::hw::{Level, RelayPin, RelayState, SimulatedPin};
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::setup_env;

fn attach_relay(
    pin: &SimulatedPin,
    store: &Store,
    clock: &Arc<ManualClock>,
) -> Relay<SimulatedPin> {
    Relay::new(RelayPin::attach(pin.clone()), store.clone(), clock.clone())
}

#[test]
fn last_write_wins_between_processes() {
    let env = setup_env();
    let store = Store::new(env.db.clone());
    store.ensure_schema().expect("schema");

    let pin = SimulatedPin::new();
    let clock = Arc::new(ManualClock::new(
        Local.with_ymd_and_hms(2026, 4, 1, 6, 0, 0).unwrap(),
    ));

    // Scheduler process starts first and forces the relay OFF.
    let mut scheduler = Relay::new(
        RelayPin::initialize(pin.clone()),
        store.clone(),
        clock.clone(),
    );
    let mut control = attach_relay(&pin, &store, &clock);

    assert!(scheduler.turn_on(Source::Program).switched());
    assert_eq!(control.state(), RelayState::On);

    // A manual "off" lands in the middle of the program.
    clock.advance(Duration::from_secs(60));
    assert!(control.turn_off(Source::Manual).switched());
    assert_eq!(store.current_session().expect("session"), None);

    // The program's own "off" is now a no-op, its next "on" proceeds.
    assert_eq!(
        scheduler.turn_off(Source::Program),
        Transition::Unchanged(RelayState::Off)
    );
    clock.advance(Duration::from_secs(120));
    assert!(scheduler.turn_on(Source::Program).switched());
    assert_eq!(pin.level(), Level::Low);
    assert_eq!(
        store.current_session().expect("session").map(|s| s.on_since),
        Some(Local.with_ymd_and_hms(2026, 4, 1, 6, 3, 0).unwrap().timestamp())
    );
}

#[test]
fn program_run_is_visible_to_the_other_process() {
    let env = setup_env();
    let store = Store::new(env.db.clone());
    store.ensure_schema().expect("schema");

    let pin = SimulatedPin::new();
    let clock = Arc::new(ManualClock::new(
        Local.with_ymd_and_hms(2026, 4, 1, 15, 0, 0).unwrap(),
    ));
    let mut scheduler = Relay::new(
        RelayPin::initialize(pin.clone()),
        store.clone(),
        clock.clone(),
    );

    let program = DailyProgram::new(vec![
        Step::new(Action::On, 10),
        Step::new(Action::Off, 0),
    ]);
    let run = program.run(&mut scheduler).expect("program run");
    assert_eq!(run.duration_secs(), 10);

    // The control service only sees the shared file.
    let reader = Store::new(env.db.clone());
    assert_eq!(reader.latest_runs(5).expect("runs"), vec![run]);
    assert_eq!(reader.current_session().expect("session"), None);
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(10)]);
}
