//! External raster representation of a sampler.

use std::fmt;

/// An 8-bit RGBA pixel buffer, row-major, tightly packed.
///
/// This is the form a sampler takes when it leaves the editor as an image.
/// Only the red channel of the first row is meaningful on import; export
/// fills red, green and blue with the same value and alpha with 255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Pixel data, 4 bytes per texel. Length = width × height × 4.
    pub rgba: Vec<u8>,
}

impl Raster {
    /// Number of bytes per texel.
    pub const CHANNELS: usize = 4;

    /// Wrap an existing RGBA buffer.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba,
        }
    }

    /// Byte length of one row.
    pub fn row_stride(&self) -> usize {
        self.width as usize * Self::CHANNELS
    }

    /// The texels of row `y`, if the buffer holds that row completely.
    pub fn row(&self, y: u32) -> Option<&[[u8; 4]]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.row_stride();
        let bytes = self.rgba.get(start..start + self.row_stride())?;
        Some(bytemuck::cast_slice(bytes))
    }
}

impl fmt::Display for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} RGBA8", self.width, self.height)
    }
}
