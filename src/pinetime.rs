//! The PineTime as face host
//!
//! Owns the display, the wall clock and the layer state. Battery readings and
//! haptics live in their own tasks and are reached through statics.

use core::sync::atomic::Ordering;

use analog_watchface::{
    assets,
    battery::BatteryState,
    time::TimeReference,
    ui::{bitmap::Bitmap, WatchFace},
    AssetId, Error, FrameBuffer, Host, LayerId, Pulse, Resource, TimeUnits,
};
use chrono::NaiveDateTime;
use embassy_nrf::peripherals::SPI2;
use embassy_time::Duration;
use embedded_graphics::{mono_font::MonoFont, primitives::Rectangle};
use heapless::Vec;

use crate::{
    peripherals::display::Display,
    system::time::TimeManager,
    BATTERY_CHARGE, BATTERY_CHARGING, HAPTICS,
};

pub struct PineTimeHost {
    display: Display<SPI2>,
    clock: TimeManager,
    /// Acquired and not yet released
    live: Vec<Resource, 6>,
    ticks: TimeUnits,
    connectivity: bool,
    connected: bool,
    icon_hidden: bool,
    dirty: bool,
    /// Wall clock at the previous tick
    last_tick: NaiveDateTime,
}

impl PineTimeHost {
    pub fn new(display: Display<SPI2>) -> Self {
        let clock = TimeManager::init();
        let last_tick = clock.now();
        Self {
            display,
            clock,
            live: Vec::new(),
            ticks: TimeUnits::NONE,
            connectivity: false,
            connected: false,
            icon_hidden: false,
            dirty: false,
            last_tick,
        }
    }

    fn acquire(&mut self, resource: Resource) -> Result<(), Error> {
        self.live.push(resource).map_err(|_| Error::SurfaceUnavailable)
    }

    fn is_live(&self, resource: Resource) -> bool {
        self.live.contains(&resource)
    }

    /// Time left until the next minute tick
    pub fn until_next_minute(&self) -> Duration {
        self.clock.until_next_minute()
    }

    /// Deliver a tick if a subscribed unit, or a coarser one, changed since the last one
    pub fn tick<F: WatchFace>(&mut self, face: &mut F) {
        let now = self.clock.now();
        let due = self.ticks.due(&self.last_tick, &now);
        self.last_tick = now;
        if let Some(changed) = due {
            face.on_tick(self, &now, changed);
        }
    }

    /// Re-anchor the wall clock and tick if that moved it across a unit
    pub fn set_time<F: WatchFace>(&mut self, face: &mut F, reference: TimeReference) {
        self.clock.set_time(reference);
        defmt::info!("Time set");
        self.tick(face);
    }

    /// Record a link change and forward it to the face
    pub fn connection_changed<F: WatchFace>(&mut self, face: &mut F, connected: bool) {
        self.connected = connected;
        if self.connectivity {
            face.on_connection(self, connected);
        }
    }

    /// Composite the visible layers and push them to the panel if anything changed
    pub fn present<F: WatchFace>(&mut self, face: &F) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let mut frame = FrameBuffer::new();
        if self.is_live(Resource::Layer(LayerId::Face)) {
            let _ = face.draw(LayerId::Face, &*self, &mut frame);
        }
        if self.is_live(Resource::Layer(LayerId::Icon)) && !self.icon_hidden {
            let _ = face.draw(LayerId::Icon, &*self, &mut frame);
        }
        if let Err(e) = self.display.show(&frame) {
            defmt::warn!("Display update failed: {}", e);
        }
    }
}

impl Host for PineTimeHost {
    fn create_window(&mut self) -> Result<(), Error> {
        self.display.wake().map_err(|e| {
            defmt::warn!("Display unavailable: {}", e);
            Error::SurfaceUnavailable
        })?;
        self.acquire(Resource::Window)
    }

    fn create_layer(&mut self, layer: LayerId, bounds: Rectangle) -> Result<(), Error> {
        if !self.is_live(Resource::Window) {
            return Err(Error::SurfaceUnavailable);
        }
        defmt::debug!(
            "Layer {} at ({}, {}) {}x{}",
            layer,
            bounds.top_left.x,
            bounds.top_left.y,
            bounds.size.width,
            bounds.size.height
        );
        self.acquire(Resource::Layer(layer))?;
        self.dirty = true;
        Ok(())
    }

    fn load_bitmap(&mut self, id: AssetId) -> Result<Bitmap<'static>, Error> {
        let bitmap = assets::bitmap(id)?;
        self.acquire(Resource::Bitmap(id))?;
        Ok(bitmap)
    }

    fn load_font(&mut self, id: AssetId) -> Result<&'static MonoFont<'static>, Error> {
        let font = assets::font(id)?;
        self.acquire(Resource::Font(id))?;
        Ok(font)
    }

    fn release(&mut self, resource: Resource) {
        if let Some(index) = self.live.iter().position(|r| *r == resource) {
            self.live.remove(index);
        }
        if resource == Resource::Window {
            self.display.sleep();
        }
    }

    fn subscribe_ticks(&mut self, units: TimeUnits) {
        self.ticks = self.ticks | units;
    }

    fn subscribe_connectivity(&mut self) {
        self.connectivity = true;
    }

    fn connected(&self) -> bool {
        self.connected
    }

    fn battery(&self) -> BatteryState {
        BatteryState::new(
            BATTERY_CHARGE.load(Ordering::Relaxed),
            BATTERY_CHARGING.load(Ordering::Relaxed),
        )
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    fn vibrate(&mut self, pulse: Pulse) {
        HAPTICS.signal(pulse);
    }

    fn set_layer_hidden(&mut self, layer: LayerId, hidden: bool) {
        if layer == LayerId::Icon && self.icon_hidden != hidden {
            self.icon_hidden = hidden;
            self.dirty = true;
        }
    }

    fn mark_dirty(&mut self, _layer: LayerId) {
        self.dirty = true;
    }
}
