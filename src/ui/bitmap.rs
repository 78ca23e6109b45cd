//! Packed 1-bit rasters

use embedded_graphics::{geometry::Size, pixelcolor::BinaryColor};

/// Borrowed 1-bit raster.
///
/// Rows are stored top to bottom, each padded to whole bytes, leftmost pixel
/// in the most significant bit. A set bit is a lit (white) pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap<'a> {
    data: &'a [u8],
    size: Size,
}

impl<'a> Bitmap<'a> {
    /// Bytes used by one row of a raster `width` pixels wide
    pub const fn bytes_per_row(width: u32) -> usize {
        width.div_ceil(8) as usize
    }

    /// Wrap raster data, checking that its length matches `size`
    pub fn new(data: &'a [u8], size: Size) -> Option<Self> {
        if size.width == 0 || size.height == 0 {
            return None;
        }
        if data.len() != Self::bytes_per_row(size.width) * size.height as usize {
            return None;
        }
        Some(Self { data, size })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Color of the pixel at (`x`, `y`), `None` outside the raster
    pub fn color_at(&self, x: u32, y: u32) -> Option<BinaryColor> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let byte = self.data[y as usize * Self::bytes_per_row(self.size.width) + x as usize / 8];
        Some(BinaryColor::from(byte & (0x80 >> (x % 8)) != 0))
    }

    /// All pixel colors, row by row
    pub fn colors(&self) -> impl Iterator<Item = BinaryColor> + '_ {
        let Size { width, height } = self.size;
        (0..height).flat_map(move |y| {
            (0..width).map(move |x| self.color_at(x, y).unwrap_or(BinaryColor::Off))
        })
    }
}
