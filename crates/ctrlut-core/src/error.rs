//! Error type shared by the domain layer.

use crate::codec::RASTER_WIDTH;

/// Errors raised by look-up table edits and raster decoding.
///
/// Name collisions are never reported here; they are resolved by
/// [`crate::naming::disambiguate`] before insertion.
#[derive(Debug, thiserror::Error)]
pub enum LutError {
    #[error("invalid raster width for LUT: expected {RASTER_WIDTH} but got {width} (height {height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("raster buffer too short: expected at least {expected} bytes, got {actual}")]
    RasterTooShort { expected: usize, actual: usize },

    #[error("no LUT table named {0:?}")]
    UnknownTable(String),

    #[error("table {table:?} has no sampler named {sampler:?}")]
    UnknownSampler { table: String, sampler: String },

    #[error("sampler entry index {0} out of range")]
    EntryOutOfRange(usize),

    #[error("field {field} expects a {expected} value")]
    FieldValueMismatch {
        field: &'static str,
        expected: &'static str,
    },
}
