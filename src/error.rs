//! Error types

use core::fmt;

use crate::host::AssetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum Error {
    /// The host has no asset with this identifier
    MissingAsset(AssetId),
    /// Asset data does not match the expected format or size
    CorruptAsset(AssetId),
    /// The host could not provide a window or layer
    SurfaceUnavailable,
    /// Time payload does not describe a valid date and time
    InvalidTime,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingAsset(id) => write!(f, "asset {:?} not found", id),
            Error::CorruptAsset(id) => write!(f, "asset {:?} is corrupt", id),
            Error::SurfaceUnavailable => f.write_str("drawing surface unavailable"),
            Error::InvalidTime => f.write_str("invalid time"),
        }
    }
}
