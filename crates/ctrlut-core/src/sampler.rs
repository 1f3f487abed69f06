//! A single named 256-entry scalar function and its domain flags.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{self, Domain, PairPolicy, TABLE_LEN};
use crate::error::LutError;
use crate::raster::Raster;

bitflags::bitflags! {
    /// Per-sampler flag bits as stored in the material asset.
    ///
    /// Bits other than [`SamplerFlags::IS_ABSOLUTE`] are carried through
    /// untouched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SamplerFlags: u32 {
        /// Input is the absolute value of the lookup argument.
        const IS_ABSOLUTE = 1 << 0;

        const _ = !0;
    }
}

impl Default for SamplerFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl SamplerFlags {
    /// Domain convention selected by these flags.
    pub fn domain(self) -> Domain {
        if self.contains(Self::IS_ABSOLUTE) {
            Domain::Absolute
        } else {
            Domain::Signed
        }
    }
}

/// Fixed-size table of normalized values in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerTable([f32; TABLE_LEN]);

impl SamplerTable {
    /// All entries zero.
    pub fn zeroed() -> Self {
        Self([0.0; TABLE_LEN])
    }

    /// Build from raw values, clamping into [0, 1] (NaN becomes 0).
    pub fn from_values(mut values: [f32; TABLE_LEN]) -> Self {
        for value in &mut values {
            *value = normalize(*value);
        }
        Self(values)
    }

    pub fn values(&self) -> &[f32; TABLE_LEN] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.0.get(index).copied()
    }

    /// Overwrite one entry. The value is clamped into [0, 1].
    pub fn set(&mut self, index: usize, value: f32) -> Result<(), LutError> {
        let slot = self.0.get_mut(index).ok_or(LutError::EntryOutOfRange(index))?;
        *slot = normalize(value);
        Ok(())
    }

    /// Set every entry to the same value.
    pub fn fill(&mut self, value: f32) {
        self.0.fill(normalize(value));
    }

    /// Multiply every entry by `gain`, clamping the result.
    pub fn scale(&mut self, gain: f32) {
        for value in &mut self.0 {
            *value = normalize(*value * gain);
        }
    }
}

impl Default for SamplerTable {
    fn default() -> Self {
        Self::zeroed()
    }
}

fn normalize(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl Serialize for SamplerTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SamplerTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<f32>::deserialize(deserializer)?;
        let values: [f32; TABLE_LEN] = values
            .try_into()
            .map_err(|v: Vec<f32>| D::Error::invalid_length(v.len(), &"256 table entries"))?;
        Ok(Self::from_values(values))
    }
}

/// A named sampler: the unit of rendering lookup and of caching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LutSampler {
    name: String,
    #[serde(default)]
    flags: SamplerFlags,
    #[serde(default)]
    table: SamplerTable,
}

impl LutSampler {
    /// Zero-filled sampler with default (signed) flags.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: SamplerFlags::default(),
            table: SamplerTable::zeroed(),
        }
    }

    pub fn with_table(name: impl Into<String>, flags: SamplerFlags, table: SamplerTable) -> Self {
        Self {
            name: name.into(),
            flags,
            table,
        }
    }

    /// Decode a new sampler from a raster using the convention `flags` selects.
    pub fn from_raster(
        name: impl Into<String>,
        flags: SamplerFlags,
        raster: &Raster,
        policy: PairPolicy,
    ) -> Result<Self, LutError> {
        let values = codec::decode(raster, flags.domain(), policy)?;
        Ok(Self::with_table(name, flags, SamplerTable::from_values(values)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> SamplerFlags {
        self.flags
    }

    pub fn domain(&self) -> Domain {
        self.flags.domain()
    }

    pub fn table(&self) -> &SamplerTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut SamplerTable {
        &mut self.table
    }

    pub fn set_flags(&mut self, flags: SamplerFlags) {
        self.flags = flags;
    }

    pub fn set_absolute(&mut self, absolute: bool) {
        self.flags.set(SamplerFlags::IS_ABSOLUTE, absolute);
    }

    /// Replace the table with the contents of `raster`.
    ///
    /// The table is left untouched when decoding fails.
    pub fn import_raster(&mut self, raster: &Raster, policy: PairPolicy) -> Result<(), LutError> {
        let values = codec::decode(raster, self.domain(), policy)?;
        self.table = SamplerTable::from_values(values);
        Ok(())
    }

    /// Encode the table as a grayscale strip `height` rows tall.
    pub fn export_raster(&self, height: u32) -> Raster {
        codec::encode(self.table.values(), self.domain(), height)
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }
}
