//! Clock hand angles

use chrono::Timelike;

use crate::config::FULL_TURN;

/// Wall-clock time at minute resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct ClockState {
    /// Hour of the day (0–23)
    pub hour: u32,
    /// Minute of the hour (0–59)
    pub minute: u32,
}

impl ClockState {
    pub const fn new(hour: u32, minute: u32) -> Self {
        Self { hour: hour % 24, minute: minute % 60 }
    }

    pub fn from_time<T: Timelike>(time: &T) -> Self {
        Self::new(time.hour(), time.minute())
    }

    /// Hour hand angle in `FULL_TURN` units.
    ///
    /// Afternoon hours land on a second turn (up to `FULL_TURN * 119 / 60`
    /// at 23:59), which points the same way once reduced by a full turn.
    /// The hour hand moves in 12 minute steps, not continuously.
    pub const fn hour_angle(&self) -> i32 {
        FULL_TURN * (self.hour as i32 * 5 + self.minute as i32 / 12) / 60
    }

    /// Minute hand angle in `0..FULL_TURN`
    pub const fn min_angle(&self) -> i32 {
        FULL_TURN * self.minute as i32 / 60
    }
}
