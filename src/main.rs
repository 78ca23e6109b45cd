//! Analog watchface firmware for the PineTime
//!
//! On any target other than ARM this builds a headless preview that runs the
//! face once and prints the frames as ASCII art.

#![cfg_attr(target_arch = "arm", no_std)]
#![cfg_attr(target_arch = "arm", no_main)]

#[cfg(target_arch = "arm")]
mod peripherals;
#[cfg(target_arch = "arm")]
mod pinetime;
#[cfg(target_arch = "arm")]
mod system;

#[cfg(not(target_arch = "arm"))]
mod preview;

#[cfg(not(target_arch = "arm"))]
fn main() {
    preview::run();
}

#[cfg(target_arch = "arm")]
pub use firmware::*;

#[cfg(target_arch = "arm")]
mod firmware {
    // Panic handler and debugging
    use defmt::unwrap;

    use defmt_rtt as _;
    use panic_probe as _;

    // Device
    use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};
    use embassy_executor::Spawner;
    use embassy_futures::select::{select, Either};
    use embassy_nrf::{
        bind_interrupts,
        gpio::{Input, Level, Output, OutputDrive, Pull},
        peripherals::SPI2,
        saadc::{self, ChannelConfig, Resolution, Saadc},
        spim,
    };
    use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Channel, signal::Signal};
    use embassy_time::{Duration, Timer};
    use nrf_softdevice::Softdevice;
    use static_cell::StaticCell;

    bind_interrupts!(struct Irqs {
        SAADC => saadc::InterruptHandler;
        SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
    });

    // Crate
    use crate::{
        peripherals::{backlight::Backlight, battery::Battery, display::Display, vibrator::Vibrator},
        pinetime::PineTimeHost,
        system::{
            bluetooth::{self, Server},
            config as system_config,
        },
    };
    use analog_watchface::{
        battery::BatteryState, config::BATTERY_SAMPLE_SECS, time::TimeReference, ui::WatchFace,
        FaceRenderer, Pulse,
    };

    /// Events delivered to the UI task
    pub enum HostEvent {
        /// A central connected (`true`) or disconnected (`false`)
        Connectivity(bool),
        /// The phone wrote the current time
        TimeSync(TimeReference),
    }

    // Communication channels
    pub static EVENTS: Channel<ThreadModeRawMutex, HostEvent, 4> = Channel::new();
    pub static HAPTICS: Signal<ThreadModeRawMutex, Pulse> = Signal::new();
    pub static BATTERY_CHARGE: AtomicU8 = AtomicU8::new(0);
    pub static BATTERY_CHARGING: AtomicBool = AtomicBool::new(false);

    static SERVER: StaticCell<Server> = StaticCell::new();

    #[embassy_executor::task]
    async fn softdevice_task(sd: &'static Softdevice) -> ! {
        sd.run().await
    }

    #[embassy_executor::task]
    async fn bluetooth_task(sd: &'static Softdevice, server: &'static Server) -> ! {
        bluetooth::run(sd, server).await
    }

    /// Run haptic pulses requested by the face
    #[embassy_executor::task(pool_size = 1)]
    async fn notify(mut vibrator: Vibrator) {
        loop {
            let pulse = HAPTICS.wait().await;
            vibrator.pulse(pulse).await;
        }
    }

    /// Make a battery reading visible to the UI
    fn publish_battery(state: BatteryState) {
        BATTERY_CHARGE.store(state.charge_percent(), Ordering::Relaxed);
        BATTERY_CHARGING.store(state.charging, Ordering::Relaxed);
        defmt::debug!("Battery status: {}", state);
    }

    /// Sample the battery and publish the result
    #[embassy_executor::task(pool_size = 1)]
    async fn update_battery_status(mut battery: Battery, server: &'static Server) {
        loop {
            Timer::after(Duration::from_secs(BATTERY_SAMPLE_SECS)).await;

            let state = battery.read().await;
            publish_battery(state);
            if server.bas.battery_level_set(&state.charge_percent()).is_err() {
                defmt::warn!("Battery level characteristic not updated");
            }
        }
    }

    /// Host event loop driving the face
    #[embassy_executor::task(pool_size = 1)]
    async fn ui(display: Display<SPI2>) {
        let mut host = PineTimeHost::new(display);
        let mut face = unwrap!(FaceRenderer::init(&mut host));
        host.present(&face);

        loop {
            match select(EVENTS.receive(), Timer::after(host.until_next_minute())).await {
                Either::First(HostEvent::Connectivity(connected)) => {
                    host.connection_changed(&mut face, connected);
                }
                Either::First(HostEvent::TimeSync(reference)) => {
                    host.set_time(&mut face, reference);
                }
                Either::Second(()) => host.tick(&mut face),
            }
            host.present(&face);
        }
    }

    #[embassy_executor::main]
    async fn main(spawner: Spawner) {
        let mut p = embassy_nrf::init(system_config::chip());
        system_config::lower_driver_interrupts();
        defmt::info!("Initializing");

        // Initialize SAADC
        let mut saadc_config = saadc::Config::default();
        // Set resolution to 12bit, necessary for correct battery status calculation
        saadc_config.resolution = Resolution::_12BIT;
        // Pin P0.31: Voltage level
        let channel_config = ChannelConfig::single_ended(&mut p.P0_31);
        let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
        saadc.calibrate().await;

        // Initialize battery, the first frame must show a real level
        let mut battery = Battery::init(saadc, Input::new(p.P0_12, Pull::None));
        let first = battery.read().await;
        publish_battery(first);

        // Initialize vibration motor
        let vibrator = Vibrator::init(Output::new(p.P0_16, Level::High, OutputDrive::Standard));

        // Initialize backlight
        let backlight = Backlight::init(
            Output::new(p.P0_14, Level::High, OutputDrive::Standard),
            Output::new(p.P0_22, Level::High, OutputDrive::Standard),
            Output::new(p.P0_23, Level::High, OutputDrive::Standard),
        );

        // Initialize SPI
        let mut spim_config = spim::Config::default();
        // Use SPI at 8MHz (the fastest clock available on the nRF52832),
        // otherwise refreshing will be super slow.
        spim_config.frequency = spim::Frequency::M8;
        // SPI must be used in mode 3. Mode 0 (the default) won't work.
        spim_config.mode = spim::MODE_3;

        let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

        // Initialize LCD
        let display = unwrap!(Display::init(
            spim,
            Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
            Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
            Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
            backlight,
        ));

        // Initialize Bluetooth
        let sd = Softdevice::enable(&bluetooth::generate_config());
        let server: &'static Server = SERVER.init(unwrap!(Server::new(sd)));
        let sd: &'static Softdevice = sd;
        if server.bas.battery_level_set(&first.charge_percent()).is_err() {
            defmt::warn!("Battery level characteristic not updated");
        }

        defmt::info!("Initialization finished");

        // Schedule tasks
        unwrap!(spawner.spawn(softdevice_task(sd)));
        unwrap!(spawner.spawn(bluetooth_task(sd, server)));
        unwrap!(spawner.spawn(update_battery_status(battery, server)));
        unwrap!(spawner.spawn(notify(vibrator)));
        unwrap!(spawner.spawn(ui(display)));
    }
}
