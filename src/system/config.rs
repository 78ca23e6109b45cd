//! Chip setup for a watch that runs next to the SoftDevice

use embassy_nrf::{
    config::{Config, Debug, HfclkSource, LfclkSource},
    interrupt::{self, InterruptExt, Priority},
};

/// Priority for embassy's own interrupts. Levels 0, 1 and 4 belong to the SoftDevice.
const RUNTIME_PRIORITY: Priority = Priority::P2;
/// Priority for the SAADC and display SPI drivers
const DRIVER_PRIORITY: Priority = Priority::P3;

/// Peripheral configuration handed to `embassy_nrf::init`
pub fn chip() -> Config {
    let mut chip = Config::default();

    // Both crystals are fitted on the PineTime; the SoftDevice needs the 32 kHz one
    chip.hfclk_source = HfclkSource::ExternalXtal;
    chip.lfclk_source = LfclkSource::ExternalXtal;
    chip.dcdc.reg1 = true;

    chip.gpiote_interrupt_priority = RUNTIME_PRIORITY;
    chip.time_interrupt_priority = RUNTIME_PRIORITY;

    chip.debug = Debug::Allowed;
    chip
}

/// Lower the interrupts of the drivers the watch uses out of the SoftDevice range.
///
/// Call before the SAADC and SPI drivers are created.
pub fn lower_driver_interrupts() {
    for irq in [interrupt::SAADC, interrupt::SPIM2_SPIS2_SPI2] {
        irq.set_priority(DRIVER_PRIORITY);
    }
}
