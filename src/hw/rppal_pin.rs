//! Raspberry Pi GPIO backend built on `rppal`.

use super::{Direction, Level, PinDriver};
use crate::errors::{AppError, AppResult};
use rppal::gpio::{self, Gpio, IoPin, Mode, Pin};

enum Handle {
    Claimed(IoPin),
    /// Never reconfigured; dropping it leaves the pin as found.
    ReadOnly(Pin),
}

pub struct RppalPin {
    handle: Handle,
}

fn get(bcm: u8) -> AppResult<Pin> {
    let gpio = Gpio::new().map_err(|e| AppError::Gpio(e.to_string()))?;
    gpio.get(bcm).map_err(|e| AppError::Gpio(format!("GPIO{bcm}: {e}")))
}

impl RppalPin {
    /// Claim BCM pin `bcm` as an output, leaving its current level untouched.
    pub fn claim(bcm: u8) -> AppResult<Self> {
        let mut pin = get(bcm)?.into_io(Mode::Output);

        // The other process reads the level we leave behind.
        pin.set_reset_on_drop(false);

        Ok(Self {
            handle: Handle::Claimed(pin),
        })
    }

    /// Open BCM pin `bcm` for reads only.
    pub fn observe(bcm: u8) -> AppResult<Self> {
        Ok(Self {
            handle: Handle::ReadOnly(get(bcm)?),
        })
    }

    fn claimed(&mut self) -> Option<&mut IoPin> {
        match &mut self.handle {
            Handle::Claimed(pin) => Some(pin),
            Handle::ReadOnly(pin) => {
                tracing::warn!(pin = pin.pin(), "pin opened read-only, ignoring reconfiguration");
                None
            }
        }
    }
}

impl PinDriver for RppalPin {
    fn reset(&mut self) {
        if let Some(pin) = self.claimed() {
            pin.set_mode(Mode::Input);
        }
    }

    fn set_direction(&mut self, direction: Direction) {
        let mode = match direction {
            Direction::Input => Mode::Input,
            Direction::Output => Mode::Output,
        };
        if let Some(pin) = self.claimed() {
            pin.set_mode(mode);
        }
    }

    fn write_level(&mut self, level: Level) {
        if let Some(pin) = self.claimed() {
            pin.write(match level {
                Level::Low => gpio::Level::Low,
                Level::High => gpio::Level::High,
            });
        }
    }

    fn read_level(&self) -> Level {
        let level = match &self.handle {
            Handle::Claimed(pin) => pin.read(),
            Handle::ReadOnly(pin) => pin.read(),
        };
        match level {
            gpio::Level::Low => Level::Low,
            gpio::Level::High => Level::High,
        }
    }
}
