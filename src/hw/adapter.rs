//! Logical on/off boundary over a raw pin.
//!
//! The relay sits on the "normally on" contact, so electrical LOW means the
//! device is ON. This keeps the device off whenever the board is powered but
//! no process is driving the pin (boot, restart). The inversion is applied
//! here and nowhere else.

use super::{Direction, Level, PinDriver, RelayState};

const ON_LEVEL: Level = Level::Low;
const OFF_LEVEL: Level = ON_LEVEL.inverted();

fn level_for(state: RelayState) -> Level {
    match state {
        RelayState::On => ON_LEVEL,
        RelayState::Off => OFF_LEVEL,
    }
}

fn state_for(level: Level) -> RelayState {
    if level == ON_LEVEL {
        RelayState::On
    } else {
        RelayState::Off
    }
}

/// Logical state of a pin that must not be reconfigured.
///
/// Reads the level as found. An unconfigured pin is not made an output, so
/// asking for the state never starts driving a latched level.
pub fn observe_state<P: PinDriver + ?Sized>(driver: &P) -> RelayState {
    state_for(driver.read_level())
}

pub struct RelayPin<P: PinDriver> {
    driver: P,
}

impl<P: PinDriver> RelayPin<P> {
    /// Reset the pin, make it an output and force it OFF.
    ///
    /// Long-running processes start through here exactly once, so the relay
    /// never stays in an undefined or erroneously-ON level while they boot.
    pub fn initialize(mut driver: P) -> Self {
        driver.reset();
        driver.set_direction(Direction::Output);
        driver.write_level(OFF_LEVEL);
        Self { driver }
    }

    /// Take over a pin as an output without touching its current level.
    ///
    /// Used by `on`/`off`, which must not switch a running relay off.
    pub fn attach(mut driver: P) -> Self {
        driver.set_direction(Direction::Output);
        Self { driver }
    }

    pub fn set_logical_on(&mut self) {
        self.driver.write_level(level_for(RelayState::On));
    }

    pub fn set_logical_off(&mut self) {
        self.driver.write_level(level_for(RelayState::Off));
    }

    pub fn read_logical_state(&self) -> RelayState {
        state_for(self.driver.read_level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::SimulatedPin;

    #[test]
    fn logical_setters_invert_raw_level() {
        let raw = SimulatedPin::new();
        let mut pin = RelayPin::initialize(raw.clone());

        pin.set_logical_on();
        assert_eq!(raw.level(), Level::Low);
        assert_eq!(pin.read_logical_state(), RelayState::On);

        pin.set_logical_off();
        assert_eq!(raw.level(), Level::High);
        assert_eq!(pin.read_logical_state(), RelayState::Off);
    }

    #[test]
    fn initialize_forces_off_from_any_level() {
        for before in [Level::Low, Level::High] {
            let raw = SimulatedPin::with_level(before);
            let pin = RelayPin::initialize(raw.clone());

            assert_eq!(pin.read_logical_state(), RelayState::Off);
            assert_eq!(raw.direction(), Direction::Output);
            assert_eq!(raw.resets(), 1);
        }
    }

    #[test]
    fn observe_leaves_pin_configuration_alone() {
        // Unconfigured after boot: input, latched LOW.
        let raw = SimulatedPin::new();

        assert_eq!(observe_state(&raw), RelayState::On);
        assert_eq!(raw.direction(), Direction::Input);
        assert!(raw.writes().is_empty());
        assert_eq!(raw.resets(), 0);

        let idle = SimulatedPin::with_level(Level::High);
        assert_eq!(observe_state(&idle), RelayState::Off);
        assert_eq!(idle.direction(), Direction::Input);
    }

    #[test]
    fn attach_keeps_current_level() {
        let raw = SimulatedPin::with_level(Level::Low);
        let pin = RelayPin::attach(raw.clone());

        assert_eq!(pin.read_logical_state(), RelayState::On);
        assert!(raw.writes().is_empty());
    }
}
