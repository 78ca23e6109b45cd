//! The boundary between the face and the runtime hosting it
//!
//! The host owns the event loop, the layer compositor, asset storage, the
//! haptic motor and the sensors. The face never blocks and never keeps a
//! reference to the host between callbacks: every callback receives it as an
//! argument.

use chrono::{Datelike, NaiveDateTime, Timelike};
use embedded_graphics::{mono_font::MonoFont, primitives::Rectangle};

use crate::{battery::BatteryState, ui::bitmap::Bitmap, Error};

/// Bundled asset identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum AssetId {
    /// Full-canvas background raster (144x168)
    Background,
    /// Bluetooth status icon raster (9x9)
    BluetoothIcon,
    /// Bitmap font for the date line
    DateFont,
}

/// Layers the face creates on its window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum LayerId {
    /// Full-canvas layer drawn by the face on every redraw
    Face,
    /// Bitmap layer showing the bluetooth icon while disconnected
    Icon,
}

/// Anything the face acquires from the host and must hand back on shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum Resource {
    Window,
    Layer(LayerId),
    Bitmap(AssetId),
    Font(AssetId),
}

/// Haptic feedback patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum Pulse {
    Short,
    Long,
}

/// Set of calendar units, used both for tick subscriptions and to report
/// which units changed since the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct TimeUnits(u8);

impl TimeUnits {
    pub const NONE: Self = Self(0);
    pub const SECOND: Self = Self(1 << 0);
    pub const MINUTE: Self = Self(1 << 1);
    pub const HOUR: Self = Self(1 << 2);
    pub const DAY: Self = Self(1 << 3);
    pub const MONTH: Self = Self(1 << 4);
    pub const YEAR: Self = Self(1 << 5);

    /// Whether every unit in `other` is also in `self`
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether `self` and `other` share any unit
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// The changed units plus every unit finer than the coarsest of them.
    ///
    /// A jump of one hour that lands on the same minute still counts as a
    /// minute change.
    pub const fn with_finer(self) -> Self {
        if self.0 == 0 {
            return Self::NONE;
        }
        let coarsest = 1u8 << (7 - self.0.leading_zeros());
        Self((coarsest << 1) - 1)
    }

    /// Units that changed between `prev` and `now`, if any of them is due
    /// for a subscriber of `self`
    pub fn due(self, prev: &NaiveDateTime, now: &NaiveDateTime) -> Option<Self> {
        let changed = Self::changed(prev, now);
        changed.with_finer().intersects(self).then_some(changed)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Units whose value differs between `prev` and `now`.
    pub fn changed(prev: &NaiveDateTime, now: &NaiveDateTime) -> Self {
        let mut units = Self::NONE;
        if prev.second() != now.second() {
            units = units.union(Self::SECOND);
        }
        if prev.minute() != now.minute() {
            units = units.union(Self::MINUTE);
        }
        if prev.hour() != now.hour() {
            units = units.union(Self::HOUR);
        }
        if prev.day() != now.day() {
            units = units.union(Self::DAY);
        }
        if prev.month() != now.month() {
            units = units.union(Self::MONTH);
        }
        if prev.year() != now.year() {
            units = units.union(Self::YEAR);
        }
        units
    }
}

impl core::ops::BitOr for TimeUnits {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Runtime services the face depends on.
///
/// Reads (`connected`, `battery`, `now`) always succeed: a host that cannot
/// query a sensor reports its last known value.
pub trait Host {
    /// Create and show the window the face lives in
    fn create_window(&mut self) -> Result<(), Error>;

    /// Create a layer on the window. New layers are visible.
    fn create_layer(&mut self, layer: LayerId, bounds: Rectangle) -> Result<(), Error>;

    /// Load a bundled raster
    fn load_bitmap(&mut self, id: AssetId) -> Result<Bitmap<'static>, Error>;

    /// Load a bundled font
    fn load_font(&mut self, id: AssetId) -> Result<&'static MonoFont<'static>, Error>;

    /// Give back something acquired through this trait
    fn release(&mut self, resource: Resource);

    /// Request a tick whenever any of `units` changes
    fn subscribe_ticks(&mut self, units: TimeUnits);

    /// Request connectivity change notifications
    fn subscribe_connectivity(&mut self);

    /// Current bluetooth connectivity
    fn connected(&self) -> bool;

    /// Current battery state
    fn battery(&self) -> BatteryState;

    /// Current local wall-clock time
    fn now(&self) -> NaiveDateTime;

    /// Start a haptic pulse without waiting for it to finish
    fn vibrate(&mut self, pulse: Pulse);

    fn set_layer_hidden(&mut self, layer: LayerId, hidden: bool);

    /// Schedule a redraw of `layer`
    fn mark_dirty(&mut self, layer: LayerId);
}
