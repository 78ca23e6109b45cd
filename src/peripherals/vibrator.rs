//! Control the vibration motor
//!
//! Implementation based upon https://github.com/tstellanova/cst816s/blob/master/examples/touchpad.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use analog_watchface::{
    config::{LONG_PULSE_MS, SHORT_PULSE_MS},
    Pulse,
};
use embassy_nrf::{gpio::Output, peripherals::P0_16};
use embassy_time::{Duration, Timer};

/// Pulse length
fn duration(pulse: Pulse) -> Duration {
    Duration::from_millis(match pulse {
        Pulse::Short => SHORT_PULSE_MS,
        Pulse::Long => LONG_PULSE_MS,
    })
}

pub struct Vibrator {
    /// Motor enable pin (inverted)
    pin_enable: Output<'static, P0_16>,
}

impl Vibrator {
    /// Configure vibrator on boot, motor off
    pub fn init(mut enable_pin: Output<'static, P0_16>) -> Self {
        enable_pin.set_high();
        Self {
            pin_enable: enable_pin,
        }
    }

    /// Run the motor for the length of `pulse`
    pub async fn pulse(&mut self, pulse: Pulse) {
        self.pin_enable.set_low();
        Timer::after(duration(pulse)).await;
        self.pin_enable.set_high();
    }
}
