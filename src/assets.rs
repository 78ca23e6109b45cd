//! Bundled face assets
//!
//! Rasters are packed by `build.rs` from `assets/*.pbm`.

use embedded_graphics::mono_font::MonoFont;
use profont::PROFONT_14_POINT;

use crate::{
    config::{CANVAS_SIZE, ICON_BOUNDS},
    ui::bitmap::Bitmap,
    AssetId, Error,
};

static BACKGROUND: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/background.bin"));
static BLUETOOTH: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/bluetooth.bin"));

/// Look up a bundled raster
pub fn bitmap(id: AssetId) -> Result<Bitmap<'static>, Error> {
    let (data, size) = match id {
        AssetId::Background => (BACKGROUND, CANVAS_SIZE),
        AssetId::BluetoothIcon => (BLUETOOTH, ICON_BOUNDS.size),
        AssetId::DateFont => return Err(Error::MissingAsset(id)),
    };
    Bitmap::new(data, size).ok_or(Error::CorruptAsset(id))
}

/// Look up a bundled font
pub fn font(id: AssetId) -> Result<&'static MonoFont<'static>, Error> {
    match id {
        AssetId::DateFont => Ok(&PROFONT_14_POINT),
        _ => Err(Error::MissingAsset(id)),
    }
}
