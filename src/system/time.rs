//! Time keeping module for PineTime

use analog_watchface::{
    config::{BUILD_TIMESTAMP, TIMEZONE},
    time::TimeReference,
};
use chrono::NaiveDateTime;
use embassy_time::{Duration, Instant};

/// Wall clock running on the RTC driven embassy time base
pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    /// Initialize time measurement on boot, starting from the build time
    pub fn init() -> Self {
        let reference = TimeReference::from_timestamp(BUILD_TIMESTAMP, TIMEZONE, Self::ticks())
            .unwrap_or_else(|_| {
                defmt::warn!("Build timestamp out of range, starting at the epoch");
                TimeReference::from_datetime(NaiveDateTime::UNIX_EPOCH, Self::ticks())
            });
        Self { reference }
    }

    /// Microseconds since boot
    pub fn ticks() -> u64 {
        Instant::now().as_micros()
    }

    /// Get current time
    pub fn now(&self) -> NaiveDateTime {
        self.reference.now(Self::ticks())
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        self.reference = reference;
    }

    /// Time left until the wall clock reaches the next full minute
    pub fn until_next_minute(&self) -> Duration {
        Duration::from_micros(analog_watchface::time::micros_until_next_minute(&self.now()))
    }
}
