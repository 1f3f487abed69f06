//! Two-way mapping between a sampler's 256-entry table and a 512-wide raster.
//!
//! A sampler stores 256 normalized values. When exported as an image the
//! values are unfolded onto a 512-texel row so the strip reads left to right
//! across the whole input domain, then repeated for every row of the image.
//!
//! # Layout
//! ```text
//! Signed (full angle):   texel  0 .. 255  <- entries 128 .. 255  (negative half)
//!                        texel 256 .. 511 <- entries   0 .. 127  (positive half)
//!                        every entry occupies two adjacent texels
//!
//! Absolute (half angle): texel 256 + i    <- entry i
//!                        texel 255 - i    <- entry i              (mirror)
//! ```
//!
//! Decoding only reads the red channel of row 0. Under the signed convention
//! the two copies of an entry may drift apart after the image is edited
//! externally; [`PairPolicy`] decides how they are merged back.

use serde::{Deserialize, Serialize};

use crate::error::LutError;
use crate::raster::Raster;

/// Number of entries in a sampler table.
pub const TABLE_LEN: usize = 256;

/// Required raster width in texels.
pub const RASTER_WIDTH: u32 = 512;

const ROW_LEN: usize = RASTER_WIDTH as usize;
const HALF_TABLE: usize = TABLE_LEN / 2;
const CENTER: usize = ROW_LEN / 2;

/// Input domain convention of a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Domain {
    /// Input is `|x|` in [0, 1]; the raster shows the curve mirrored.
    Absolute,
    /// Input is `x` in [-1, 1]; entries 0..128 hold the positive half and
    /// entries 128..256 the negative half.
    #[default]
    Signed,
}

/// How the duplicated texel pair of a signed entry is folded back into one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PairPolicy {
    /// The right-hand texel of each pair wins.
    #[default]
    SecondCopy,
    /// Mean of both texels.
    Average,
}

impl PairPolicy {
    fn resolve(self, first: f32, second: f32) -> f32 {
        match self {
            Self::SecondCopy => second,
            Self::Average => (first + second) * 0.5,
        }
    }
}

/// Convert a stored byte to a normalized value.
pub fn byte_to_unit(byte: u8) -> f32 {
    byte as f32 / 255.0
}

/// Quantize a normalized value to a byte, rounding half away from zero.
///
/// Values outside [0, 1] are clamped; NaN maps to 0.
pub fn unit_to_byte(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Spread a table over one logical raster row.
pub fn unfold(table: &[f32; TABLE_LEN], domain: Domain) -> [f32; ROW_LEN] {
    let mut row = [0.0_f32; ROW_LEN];
    match domain {
        Domain::Absolute => {
            for (i, &value) in table.iter().enumerate() {
                row[CENTER + i] = value;
                row[CENTER - 1 - i] = value;
            }
        }
        Domain::Signed => {
            for i in (0..TABLE_LEN).step_by(2) {
                let pos = i / 2;
                let neg = pos + HALF_TABLE;
                row[CENTER + i] = table[pos];
                row[CENTER + i + 1] = table[pos];
                row[i] = table[neg];
                row[i + 1] = table[neg];
            }
        }
    }
    row
}

/// Collapse one logical raster row back into a table.
///
/// Under the absolute convention only the right half is authoritative; the
/// mirrored left half is ignored.
pub fn fold(row: &[f32; ROW_LEN], domain: Domain, policy: PairPolicy) -> [f32; TABLE_LEN] {
    let mut table = [0.0_f32; TABLE_LEN];
    match domain {
        Domain::Absolute => {
            table.copy_from_slice(&row[CENTER..]);
        }
        Domain::Signed => {
            for i in (0..TABLE_LEN).step_by(2) {
                let pos = i / 2;
                let neg = pos + HALF_TABLE;
                table[pos] = policy.resolve(row[CENTER + i], row[CENTER + i + 1]);
                table[neg] = policy.resolve(row[i], row[i + 1]);
            }
        }
    }
    table
}

/// Render a table as a grayscale strip `RASTER_WIDTH` wide and `height` rows tall.
///
/// A height of 0 still produces one row.
pub fn encode(table: &[f32; TABLE_LEN], domain: Domain, height: u32) -> Raster {
    let height = height.max(1);
    let row: Vec<[u8; 4]> = unfold(table, domain)
        .iter()
        .map(|&value| {
            let byte = unit_to_byte(value);
            [byte, byte, byte, 255]
        })
        .collect();
    let row_bytes: &[u8] = bytemuck::cast_slice(&row);

    let mut rgba = Vec::with_capacity(row_bytes.len() * height as usize);
    for _ in 0..height {
        rgba.extend_from_slice(row_bytes);
    }
    Raster::from_rgba(RASTER_WIDTH, height, rgba)
}

/// Read a table back from the red channel of the raster's first row.
///
/// Fails before producing anything if the width is not [`RASTER_WIDTH`] or
/// the buffer does not hold a full row.
pub fn decode(
    raster: &Raster,
    domain: Domain,
    policy: PairPolicy,
) -> Result<[f32; TABLE_LEN], LutError> {
    if raster.width != RASTER_WIDTH {
        return Err(LutError::InvalidDimensions {
            width: raster.width,
            height: raster.height,
        });
    }

    let stride = ROW_LEN * Raster::CHANNELS;
    let bytes = raster.rgba.get(..stride).ok_or(LutError::RasterTooShort {
        expected: stride,
        actual: raster.rgba.len(),
    })?;
    let texels: &[[u8; 4]] = bytemuck::cast_slice(bytes);

    let mut row = [0.0_f32; ROW_LEN];
    for (value, texel) in row.iter_mut().zip(texels) {
        *value = byte_to_unit(texel[0]);
    }
    Ok(fold(&row, domain, policy))
}
