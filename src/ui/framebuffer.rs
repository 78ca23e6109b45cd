//! In-memory 1-bit canvas

use core::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
    Pixel,
};

use crate::config::{CANVAS_H, CANVAS_SIZE, CANVAS_W};

const BYTES_PER_ROW: usize = (CANVAS_W as usize).div_ceil(8);
const FRAME_BYTES: usize = BYTES_PER_ROW * CANVAS_H as usize;

/// Full 144x168 canvas, one bit per pixel. Pixels outside are discarded.
#[derive(Clone)]
pub struct FrameBuffer {
    bits: [u8; FRAME_BYTES],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// A black canvas
    pub const fn new() -> Self {
        Self {
            bits: [0; FRAME_BYTES],
        }
    }

    /// Color at `point`, `None` outside the canvas
    pub fn pixel(&self, point: Point) -> Option<BinaryColor> {
        let (index, mask) = Self::locate(point)?;
        Some(BinaryColor::from(self.bits[index] & mask != 0))
    }

    /// All pixel colors, row by row
    pub fn colors(&self) -> impl Iterator<Item = BinaryColor> + '_ {
        (0..CANVAS_H as i32).flat_map(move |y| {
            (0..CANVAS_W as i32)
                .map(move |x| self.pixel(Point::new(x, y)).unwrap_or(BinaryColor::Off))
        })
    }

    fn locate(point: Point) -> Option<(usize, u8)> {
        let x = usize::try_from(point.x).ok().filter(|x| *x < CANVAS_W as usize)?;
        let y = usize::try_from(point.y).ok().filter(|y| *y < CANVAS_H as usize)?;
        Some((y * BYTES_PER_ROW + x / 8, 0x80 >> (x % 8)))
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some((index, mask)) = Self::locate(point) {
                match color {
                    BinaryColor::On => self.bits[index] |= mask,
                    BinaryColor::Off => self.bits[index] &= !mask,
                }
            }
        }
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        CANVAS_SIZE
    }
}
