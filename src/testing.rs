//! Host double for unit tests
//!
//! Records every call, tracks live resources, and serves synthetic rasters.

use chrono::{NaiveDate, NaiveDateTime};
use embedded_graphics::{geometry::Size, mono_font::MonoFont, primitives::Rectangle};

use crate::{
    battery::BatteryState,
    config::{CANVAS_H, CANVAS_W, ICON_BOUNDS},
    ui::bitmap::Bitmap,
    AssetId, Error, Host, LayerId, Pulse, Resource, TimeUnits,
};

const BACKGROUND_LEN: usize = Bitmap::bytes_per_row(CANVAS_W) * CANVAS_H as usize;

/// All black, so only what the face draws is lit
static BACKGROUND: [u8; BACKGROUND_LEN] = [0x00; BACKGROUND_LEN];
/// 9x9, all white
static ICON: [u8; 18] = [0xFF, 0x80, 0xFF, 0x80, 0xFF, 0x80, 0xFF, 0x80, 0xFF, 0x80, 0xFF, 0x80, 0xFF, 0x80, 0xFF, 0x80, 0xFF, 0x80];

/// Tuesday 5 March 2024 at `hour:minute`
pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Mutating calls, in the order they were made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    CreateWindow,
    CreateLayer(LayerId),
    LoadBitmap(AssetId),
    LoadFont(AssetId),
    Release(Resource),
    SubscribeTicks(TimeUnits),
    SubscribeConnectivity,
    Vibrate(Pulse),
    SetLayerHidden(LayerId, bool),
    MarkDirty(LayerId),
}

pub struct RecordingHost {
    pub calls: Vec<HostCall>,
    /// Acquired and not yet released
    pub live: Vec<Resource>,
    pub released: Vec<Resource>,
    pub pulses: Vec<Pulse>,
    pub tick_units: Option<TimeUnits>,
    pub connectivity_subscribed: bool,
    pub icon_hidden: Option<bool>,

    pub connected: bool,
    pub battery: BatteryState,
    pub time: NaiveDateTime,
    /// Loading this asset fails with `MissingAsset`
    pub fail_on: Option<AssetId>,
    /// Serve a background raster of the wrong size
    pub small_background: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            live: Vec::new(),
            released: Vec::new(),
            pulses: Vec::new(),
            tick_units: None,
            connectivity_subscribed: false,
            icon_hidden: None,
            connected: false,
            battery: BatteryState::new(50, false),
            time: at(3, 29),
            fail_on: None,
            small_background: false,
        }
    }

    fn acquire(&mut self, resource: Resource) {
        assert!(!self.live.contains(&resource), "{:?} acquired twice", resource);
        self.live.push(resource);
    }
}

impl Host for RecordingHost {
    fn create_window(&mut self) -> Result<(), Error> {
        self.calls.push(HostCall::CreateWindow);
        self.acquire(Resource::Window);
        Ok(())
    }

    fn create_layer(&mut self, layer: LayerId, bounds: Rectangle) -> Result<(), Error> {
        self.calls.push(HostCall::CreateLayer(layer));
        if layer == LayerId::Icon {
            assert_eq!(bounds, ICON_BOUNDS);
        }
        self.acquire(Resource::Layer(layer));
        Ok(())
    }

    fn load_bitmap(&mut self, id: AssetId) -> Result<Bitmap<'static>, Error> {
        self.calls.push(HostCall::LoadBitmap(id));
        if self.fail_on == Some(id) {
            return Err(Error::MissingAsset(id));
        }
        let bitmap = match id {
            AssetId::Background if self.small_background => Bitmap::new(&ICON, ICON_BOUNDS.size),
            AssetId::Background => Bitmap::new(&BACKGROUND, Size::new(CANVAS_W, CANVAS_H)),
            AssetId::BluetoothIcon => Bitmap::new(&ICON, ICON_BOUNDS.size),
            AssetId::DateFont => None,
        }
        .ok_or(Error::MissingAsset(id))?;
        self.acquire(Resource::Bitmap(id));
        Ok(bitmap)
    }

    fn load_font(&mut self, id: AssetId) -> Result<&'static MonoFont<'static>, Error> {
        self.calls.push(HostCall::LoadFont(id));
        if self.fail_on == Some(id) || id != AssetId::DateFont {
            return Err(Error::MissingAsset(id));
        }
        self.acquire(Resource::Font(id));
        Ok(&profont::PROFONT_14_POINT)
    }

    fn release(&mut self, resource: Resource) {
        self.calls.push(HostCall::Release(resource));
        let index = self
            .live
            .iter()
            .position(|r| *r == resource)
            .unwrap_or_else(|| panic!("{:?} released but not live", resource));
        self.live.remove(index);
        self.released.push(resource);
    }

    fn subscribe_ticks(&mut self, units: TimeUnits) {
        self.calls.push(HostCall::SubscribeTicks(units));
        self.tick_units = Some(units);
    }

    fn subscribe_connectivity(&mut self) {
        self.calls.push(HostCall::SubscribeConnectivity);
        self.connectivity_subscribed = true;
    }

    fn connected(&self) -> bool {
        self.connected
    }

    fn battery(&self) -> BatteryState {
        self.battery
    }

    fn now(&self) -> NaiveDateTime {
        self.time
    }

    fn vibrate(&mut self, pulse: Pulse) {
        self.calls.push(HostCall::Vibrate(pulse));
        self.pulses.push(pulse);
    }

    fn set_layer_hidden(&mut self, layer: LayerId, hidden: bool) {
        self.calls.push(HostCall::SetLayerHidden(layer, hidden));
        if layer == LayerId::Icon {
            self.icon_hidden = Some(hidden);
        }
    }

    fn mark_dirty(&mut self, layer: LayerId) {
        self.calls.push(HostCall::MarkDirty(layer));
    }
}
