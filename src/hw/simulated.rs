//! In-memory pin used by `--simulate` and by tests.
//!
//! Clones share the same pin, so a test can keep a handle while the
//! relay owns another one.

use super::{Direction, Level, PinDriver};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
struct PinState {
    direction: Direction,
    level: Level,
    writes: Vec<Level>,
    resets: usize,
}

#[derive(Debug, Clone)]
pub struct SimulatedPin {
    state: Arc<Mutex<PinState>>,
}

impl Default for SimulatedPin {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPin {
    /// A floating input reading LOW, like an unconfigured pin after boot.
    pub fn new() -> Self {
        Self::with_level(Level::Low)
    }

    pub fn with_level(level: Level) -> Self {
        Self {
            state: Arc::new(Mutex::new(PinState {
                direction: Direction::Input,
                level,
                writes: Vec::new(),
                resets: 0,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, PinState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn level(&self) -> Level {
        self.state().level
    }

    pub fn direction(&self) -> Direction {
        self.state().direction
    }

    /// Every level written since creation, oldest first.
    pub fn writes(&self) -> Vec<Level> {
        self.state().writes.clone()
    }

    pub fn resets(&self) -> usize {
        self.state().resets
    }
}

impl PinDriver for SimulatedPin {
    fn reset(&mut self) {
        let mut s = self.state();
        s.direction = Direction::Input;
        s.resets += 1;
    }

    fn set_direction(&mut self, direction: Direction) {
        self.state().direction = direction;
    }

    fn write_level(&mut self, level: Level) {
        let mut s = self.state();
        // An input pin ignores writes.
        if s.direction == Direction::Output {
            s.level = level;
        }
        s.writes.push(level);
    }

    fn read_level(&self) -> Level {
        self.state().level
    }
}
