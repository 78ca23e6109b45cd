//! Battery status check
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use analog_watchface::battery::{millivolts_from_adc, percent_from_millivolts, BatteryState};
use embassy_nrf::{gpio::Input, peripherals::P0_12, saadc::Saadc};

/// Battery API
pub struct Battery {
    /// ADC instance for battery voltage measurement (P0.31)
    adc: Saadc<'static, 1>,
    /// Charge indication pin:
    /// high = battery, low = charging
    pin_charge_indication: Input<'static, P0_12>,
    /// Last successful reading
    last: BatteryState,
}

impl Battery {
    /// Configure battery settings on boot
    pub fn init(adc: Saadc<'static, 1>, charge_pin: Input<'static, P0_12>) -> Self {
        Self {
            adc,
            pin_charge_indication: charge_pin,
            last: BatteryState::default(),
        }
    }

    /// Charging state of the battery
    pub fn is_charging(&self) -> bool {
        self.pin_charge_indication.is_low()
    }

    /// Sample the battery.
    ///
    /// An out-of-range sample keeps the last known charge.
    pub async fn read(&mut self) -> BatteryState {
        let charge = match self.voltage().await {
            Some(voltage) => percent_from_millivolts(voltage),
            None => {
                defmt::warn!("Battery sample out of range");
                self.last.charge_percent()
            }
        };
        self.last = BatteryState::new(charge, self.is_charging());
        self.last
    }

    /// Battery voltage in millivolts
    async fn voltage(&mut self) -> Option<u16> {
        let mut buf = [0; 1];
        self.adc.sample(&mut buf).await;
        millivolts_from_adc(buf[0])
    }
}
