//! Raster load/save through the `image` crate.

use std::path::Path;

use ctrlut_core::{LutError, Raster};

use crate::error::FileError;

/// Load an image from disk as 8-bit RGBA.
///
/// Any format the `image` crate decodes is accepted; other channel layouts
/// and bit depths are converted.
pub fn load_raster(path: &Path) -> Result<Raster, FileError> {
    let img = image::open(path).map_err(FileError::Image)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Raster::from_rgba(width, height, rgba.into_raw()))
}

/// Write a raster to disk; the format follows the path's extension.
pub fn save_raster(path: &Path, raster: &Raster) -> Result<(), FileError> {
    let expected = raster.row_stride() * raster.height as usize;
    let buffer = image::RgbaImage::from_raw(raster.width, raster.height, raster.rgba.clone()).ok_or(
        LutError::RasterTooShort {
            expected,
            actual: raster.rgba.len(),
        },
    )?;
    buffer.save(path).map_err(FileError::Image)
}
