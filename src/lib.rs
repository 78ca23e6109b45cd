//! Analog watchface library - the face logic, testable on the host.
//!
//! The face is a thin event handler: a host runtime owns the event loop, the
//! compositor and the assets, and calls into [`FaceRenderer`] on startup,
//! shutdown, every minute tick, every connectivity change and every redraw.
//! The binary (`main.rs`) provides that host for the PineTime, or a headless
//! ASCII preview on any other target.
//!
//! # Testing
//!
//! ```bash
//! cargo test --lib
//! ```

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

pub mod assets;
pub mod battery;
pub mod clock;
pub mod config;
pub mod date;
pub mod error;
pub mod host;
pub mod time;
pub mod ui;

#[cfg(test)]
mod testing;

pub use error::Error;
pub use host::{AssetId, Host, LayerId, Pulse, Resource, TimeUnits};
pub use ui::{analog_face::FaceRenderer, framebuffer::FrameBuffer, WatchFaceState};
