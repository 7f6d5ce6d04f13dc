//! Pin-level hardware access.
//!
//! [`PinDriver`] is the raw digital I/O primitive (direction, level write,
//! level read). [`RelayPin`] sits on top of it and is the only place that
//! knows the relay is wired active-low.

pub mod adapter;
#[cfg(target_os = "linux")]
pub mod rppal_pin;
pub mod simulated;

pub use adapter::{RelayPin, observe_state};
pub use simulated::SimulatedPin;

use crate::errors::AppResult;
use serde::Serialize;
use std::fmt;

/// Raw electrical level of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub const fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Logical relay state, as seen by everything above the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RelayState {
    Off,
    On,
}

impl RelayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayState::Off => "OFF",
            RelayState::On => "ON",
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, RelayState::On)
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw digital I/O on one pin.
///
/// Writes are infallible at the register level; a pin that cannot be
/// claimed fails when the driver is constructed, never later.
pub trait PinDriver: Send {
    /// Drop any previous configuration (mode, level) of the pin.
    fn reset(&mut self);
    fn set_direction(&mut self, direction: Direction);
    fn write_level(&mut self, level: Level);
    fn read_level(&self) -> Level;
}

impl<P: PinDriver + ?Sized> PinDriver for Box<P> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn set_direction(&mut self, direction: Direction) {
        (**self).set_direction(direction)
    }

    fn write_level(&mut self, level: Level) {
        (**self).write_level(level)
    }

    fn read_level(&self) -> Level {
        (**self).read_level()
    }
}

/// What a process is allowed to do with the pin it opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Claim the pin as an output.
    Drive,
    /// Read the level only. Mode and level stay as found.
    Observe,
}

/// Open the hardware pin, or an in-memory one when `simulate` is set.
pub fn open_pin(bcm: u8, simulate: bool, access: Access) -> AppResult<Box<dyn PinDriver>> {
    if simulate {
        tracing::warn!(pin = bcm, "using simulated pin, no hardware is driven");
        // Pulled up, like an idle active-low relay input.
        return Ok(Box::new(SimulatedPin::with_level(Level::High)));
    }
    open_hardware_pin(bcm, access)
}

#[cfg(target_os = "linux")]
fn open_hardware_pin(bcm: u8, access: Access) -> AppResult<Box<dyn PinDriver>> {
    let pin = match access {
        Access::Drive => rppal_pin::RppalPin::claim(bcm)?,
        Access::Observe => rppal_pin::RppalPin::observe(bcm)?,
    };
    Ok(Box::new(pin))
}

#[cfg(not(target_os = "linux"))]
fn open_hardware_pin(bcm: u8, _access: Access) -> AppResult<Box<dyn PinDriver>> {
    Err(crate::errors::AppError::Gpio(format!(
        "GPIO{bcm} unavailable: hardware pins are only supported on Linux (use --simulate)"
    )))
}
