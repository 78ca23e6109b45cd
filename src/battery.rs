//! Battery charge state
//!
//! Voltage curve based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use crate::config::{BATTERY_TRACK_HALF, BATTERY_TRACK_START};

/// Battery state as read by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct BatteryState {
    /// Charge in percent (0–100)
    charge_percent: u8,
    /// Charging state
    pub charging: bool,
}

impl BatteryState {
    /// Create a battery state, clamping the charge to 100%
    pub const fn new(charge_percent: u8, charging: bool) -> Self {
        Self {
            charge_percent: if charge_percent > 100 { 100 } else { charge_percent },
            charging,
        }
    }

    /// Battery capacity in percent
    pub const fn charge_percent(&self) -> u8 {
        self.charge_percent
    }

    /// Horizontal position of the charge dot on the battery track.
    ///
    /// 0% sits on the left end of the track, 100% on the right end.
    pub const fn indicator_x(&self) -> i32 {
        BATTERY_TRACK_START + 2 * BATTERY_TRACK_HALF * self.charge_percent as i32 / 100
    }
}

/// Estimate battery capacity from its voltage in millivolts.
///
/// Uses fixed data points and linear interpolation in between.
pub const fn percent_from_millivolts(voltage: u16) -> u8 {
    (match voltage {
        0..=3449 => 0,
        3450..=3699 => (voltage - 3450) / 5,
        3700..=4199 => 50 + (voltage - 3700) / 10,
        _ => 100,
    }) as u8
}

/// Convert a 12 bit SAADC sample of the halved battery voltage into millivolts.
///
/// Returns `None` for samples outside the converter range.
pub const fn millivolts_from_adc(raw: i16) -> Option<u16> {
    match raw {
        // multiply by 2 * 1000 for mV and divide by (2 ^ 12 / 3.3V reference)
        // keep as 32 bit for multiplication
        0..=4095 => Some((raw as u32 * 2000 / 1241) as u16),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_indicator_track_ends() {
        assert_eq!(BatteryState::new(0, false).indicator_x(), BATTERY_TRACK_START);
        assert_eq!(
            BatteryState::new(100, false).indicator_x(),
            BATTERY_TRACK_START + 2 * BATTERY_TRACK_HALF
        );
    }

    #[test]
    fn test_indicator_midpoint() {
        assert_eq!(
            BatteryState::new(50, false).indicator_x(),
            BATTERY_TRACK_START + BATTERY_TRACK_HALF
        );
    }

    #[test]
    fn test_charge_is_clamped() {
        assert_eq!(BatteryState::new(180, true).charge_percent(), 100);
        assert_eq!(BatteryState::new(180, true).indicator_x(), 107);
    }

    #[test]
    fn test_percent_curve() {
        assert_eq!(percent_from_millivolts(3000), 0);
        assert_eq!(percent_from_millivolts(3450), 0);
        assert_eq!(percent_from_millivolts(3600), 30);
        assert_eq!(percent_from_millivolts(3700), 50);
        assert_eq!(percent_from_millivolts(4000), 80);
        assert_eq!(percent_from_millivolts(4199), 99);
        assert_eq!(percent_from_millivolts(4300), 100);
    }

    #[test]
    fn test_adc_conversion() {
        assert_eq!(millivolts_from_adc(0), Some(0));
        // half of 4.0V on the divider
        assert_eq!(millivolts_from_adc(2482), Some(4000));
        assert_eq!(millivolts_from_adc(-3), None);
        assert_eq!(millivolts_from_adc(4096), None);
    }

    proptest! {
        #[test]
        fn indicator_is_monotonic(a in 0u8..=100, b in 0u8..=100) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                BatteryState::new(lo, false).indicator_x() <= BatteryState::new(hi, false).indicator_x()
            );
        }

        #[test]
        fn percent_is_monotonic(a in 0u16..5000, b in 0u16..5000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(percent_from_millivolts(lo) <= percent_from_millivolts(hi));
        }
    }
}
