//! Speed slider
//!
//! The slider is shared between whoever adjusts it (the TUI, the CLI) and the
//! runner, which reads it again before every step so a change takes effect
//! mid-run.

use super::constants::{DELAY_MS_PER_NOTCH, SPEED_DEFAULT, SPEED_MAX, SPEED_MIN};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Delay between steps for a slider position: `(100 - v) * 2` milliseconds
pub fn step_delay(speed: u8) -> Duration {
    let speed = speed.clamp(SPEED_MIN, SPEED_MAX);
    Duration::from_millis(u64::from(SPEED_MAX - speed) * DELAY_MS_PER_NOTCH)
}

/// Shared handle to the speed slider; clones observe the same value
#[derive(Debug, Clone)]
pub struct SpeedControl(Rc<Cell<u8>>);

impl SpeedControl {
    pub fn new(speed: i64) -> Self {
        let control = SpeedControl(Rc::new(Cell::new(SPEED_DEFAULT)));
        control.set(speed);
        control
    }

    pub fn get(&self) -> u8 {
        self.0.get()
    }

    /// Set the slider, clamped to `[SPEED_MIN, SPEED_MAX]`
    pub fn set(&self, speed: i64) {
        let clamped = speed.clamp(i64::from(SPEED_MIN), i64::from(SPEED_MAX)) as u8;
        self.0.set(clamped);
    }

    pub fn adjust(&self, delta: i64) {
        self.set(i64::from(self.get()) + delta);
    }

    /// Current delay between steps
    pub fn delay(&self) -> Duration {
        step_delay(self.get())
    }
}

impl Default for SpeedControl {
    fn default() -> Self {
        SpeedControl::new(i64::from(SPEED_DEFAULT))
    }
}
