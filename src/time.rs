//! Wall-clock time keeping
//!
//! The wall clock is a reference time anchored to a reading of a monotonic
//! microsecond counter. It is seeded from the build time and re-anchored
//! whenever a phone writes the Current Time Service characteristic.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use crate::Error;

/// Length of a Current Time Service payload
pub const CTS_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeReference {
    /// Clock time
    time: NaiveDateTime,
    /// Monotonic counter value at `time`, in microseconds
    ticks_us: u64,
}

impl TimeReference {
    /// Create new time reference from NaiveDateTime
    pub const fn from_datetime(time: NaiveDateTime, ticks_us: u64) -> Self {
        Self { time, ticks_us }
    }

    /// Create a time reference from UTC epoch seconds shifted by `offset_secs`
    pub fn from_timestamp(secs: i64, offset_secs: i32, ticks_us: u64) -> Result<Self, Error> {
        let time = DateTime::from_timestamp(secs + offset_secs as i64, 0)
            .ok_or(Error::InvalidTime)?
            .naive_utc();
        Ok(Self::from_datetime(time, ticks_us))
    }

    /// Create new time reference from Current Time Service data
    ///
    /// Layout: year (u16 LE), month, day, hours, minutes, seconds,
    /// day of week, fractions of 1/256 s, adjust reason.
    pub fn from_cts_bytes(bytes: &[u8], ticks_us: u64) -> Result<Self, Error> {
        if bytes.len() < CTS_LEN {
            return Err(Error::InvalidTime);
        }
        let year = u16::from_le_bytes([bytes[0], bytes[1]]) as i32;
        let month = bytes[2] as u32;
        let day = bytes[3] as u32;
        let hour = bytes[4] as u32;
        let min = bytes[5] as u32;
        let sec = bytes[6] as u32;
        // Convert fractions_256 to milliseconds
        let milli = bytes[8] as u32 * 1000 / 256;

        let time = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_milli_opt(hour, min, sec, milli))
            .ok_or(Error::InvalidTime)?;

        Ok(Self::from_datetime(time, ticks_us))
    }

    /// Clock time at counter value `ticks_us`
    pub fn now(&self, ticks_us: u64) -> NaiveDateTime {
        let elapsed = ticks_us.saturating_sub(self.ticks_us);
        let delta = TimeDelta::microseconds(i64::try_from(elapsed).unwrap_or(i64::MAX));
        self.time.checked_add_signed(delta).unwrap_or(self.time)
    }
}

/// Microseconds from `now` until the next full minute
pub fn micros_until_next_minute(now: &NaiveDateTime) -> u64 {
    let into_minute_us =
        now.second() as u64 * 1_000_000 + (now.nanosecond() % 1_000_000_000) as u64 / 1_000;
    60_000_000 - into_minute_us
}
