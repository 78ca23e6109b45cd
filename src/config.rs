//! Face layout and timing configuration
//!
//! All coordinates are in canvas space: a 144x168 surface with the origin in
//! the top left corner.

use embedded_graphics::{
    geometry::{Point, Size},
    primitives::Rectangle,
};

// Build time as UTC epoch seconds, generated by build.rs
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

/// Canvas width in pixels
pub const CANVAS_W: u32 = 144;
/// Canvas height in pixels
pub const CANVAS_H: u32 = 168;
/// Full canvas size
pub const CANVAS_SIZE: Size = Size::new(CANVAS_W, CANVAS_H);

/// Pivot of both hands. 99 is the real centre, 96 sits better on the dial.
pub const CENTER: Point = Point::new(71, 96);

/// Radius of the hub pin; the hub rings are drawn relative to it
pub const DOT_RADIUS: u32 = 4;

/// Integer representation of 360 degrees
pub const FULL_TURN: i32 = 0x1_0000;

/// Left end of the battery track
pub const BATTERY_TRACK_START: i32 = 35;
/// Half the length of the battery track
pub const BATTERY_TRACK_HALF: i32 = 36;
/// Vertical position of the battery track
pub const BATTERY_TRACK_Y: i32 = 15;
/// Radius of the charge indicator dot
pub const BATTERY_DOT_RADIUS: u32 = 2;

/// Region the date line is drawn into, clipped.
///
/// ProFont caps start 3 rows into the box, so the line sits in rows 1 to 11,
/// clear of the battery track below.
pub const DATE_TEXT_BOUNDS: Rectangle = Rectangle::new(Point::new(0, -2), Size::new(CANVAS_W, 24));

/// Bluetooth status icon layer
pub const ICON_BOUNDS: Rectangle = Rectangle::new(Point::new(67, 92), Size::new(9, 9));

/// Local time offset from UTC in seconds
pub const TIMEZONE: i32 = 3_600;

/// Seconds between battery samples
pub const BATTERY_SAMPLE_SECS: u64 = 30;

/// Duration of the short haptic pulse in ms
pub const SHORT_PULSE_MS: u64 = 200;
/// Duration of the long haptic pulse in ms
pub const LONG_PULSE_MS: u64 = 400;
