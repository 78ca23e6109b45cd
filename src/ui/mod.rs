//! UI definitions module
//! Based on: https://github.com/lupyuen/pinetime-watchface/blob/master/src/lib.rs
//!
//! A face turns a [`WatchFaceState`] into a [`Frame`] of draw commands, which
//! the painter then executes on any 1-bit draw target. Drawing is always a
//! full redraw of the canvas.

use chrono::NaiveDateTime;
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::Point,
    pixelcolor::BinaryColor,
    primitives::Rectangle,
};

use crate::{
    battery::BatteryState, date::DateText, host::AssetId, Error, Host, LayerId, TimeUnits,
};

pub mod analog_face;
pub mod bitmap;
pub mod framebuffer;
pub mod hand;
pub mod render;

use hand::Hand;

/// Lit pixel
pub const WHITE: BinaryColor = BinaryColor::On;
/// Unlit pixel
pub const BLACK: BinaryColor = BinaryColor::Off;

/// Callbacks a host drives a face with
pub trait WatchFace: Sized {
    /// Acquire resources and subscribe to host events
    fn init<H: Host>(host: &mut H) -> Result<Self, Error>;

    /// Release everything acquired in `init`
    fn deinit<H: Host>(self, host: &mut H);

    /// Time changed in one of the subscribed units
    fn on_tick<H: Host>(&mut self, host: &mut H, time: &NaiveDateTime, changed: TimeUnits);

    /// Bluetooth connectivity was reported
    fn on_connection<H: Host>(&mut self, host: &mut H, connected: bool);

    /// Redraw `layer` into `target`, in canvas coordinates
    fn draw<H, D>(&self, layer: LayerId, host: &H, target: &mut D) -> Result<(), D::Error>
    where
        H: Host,
        D: DrawTarget<Color = BinaryColor>;
}

/// State for the watch face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchFaceState {
    pub time: NaiveDateTime,
    pub battery: BatteryState,
}

impl WatchFaceState {
    /// Read the current state from the host
    pub fn read<H: Host>(host: &H) -> Self {
        Self {
            time: host.now(),
            battery: host.battery(),
        }
    }
}

/// A single drawing step, back to front
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    /// Blit a bundled raster with its top left corner at `origin`
    Bitmap { asset: AssetId, origin: Point },
    /// Centered, clipped text in the date font
    Text { text: DateText, bounds: Rectangle, color: BinaryColor },
    Line { start: Point, end: Point, color: BinaryColor },
    FillCircle { center: Point, radius: u32, color: BinaryColor },
    StrokeCircle { center: Point, radius: u32, color: BinaryColor },
    FillPath { hand: Hand, color: BinaryColor },
    OutlinePath { hand: Hand, color: BinaryColor },
}

/// Number of commands in every frame
pub const FRAME_COMMANDS: usize = 11;

/// One full redraw
pub type Frame = [DrawCommand; FRAME_COMMANDS];
