//! Named field updates applied across a multi-selection of samplers.
//!
//! Each editable field maps to a typed setter in a static lookup table; the UI looks
//! a field up by name and the table editor applies it to every selected
//! sibling.

use crate::error::LutError;
use crate::sampler::LutSampler;

/// Sampler properties that can be batch edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerField {
    /// The is-absolute domain flag.
    Absolute,
    /// Every entry set to one value.
    Fill,
    /// Every entry multiplied by a gain.
    Gain,
}

/// Value carried by a batch edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Scalar(f32),
}

pub type FieldSetter = fn(&mut LutSampler, FieldValue) -> Result<(), LutError>;

static FIELD_TABLE: [(SamplerField, &str, FieldSetter); 3] = [
    (SamplerField::Absolute, "absolute", set_absolute),
    (SamplerField::Fill, "fill", set_fill),
    (SamplerField::Gain, "gain", set_gain),
];

impl SamplerField {
    pub const ALL: [SamplerField; 3] = [Self::Absolute, Self::Fill, Self::Gain];

    pub fn name(self) -> &'static str {
        Self::entry(self).1
    }

    pub fn setter(self) -> FieldSetter {
        Self::entry(self).2
    }

    pub fn from_name(name: &str) -> Option<Self> {
        FIELD_TABLE
            .iter()
            .find(|(_, field_name, _)| *field_name == name)
            .map(|(field, _, _)| *field)
    }

    /// Apply this field's setter to one sampler.
    pub fn apply(self, sampler: &mut LutSampler, value: FieldValue) -> Result<(), LutError> {
        (self.setter())(sampler, value)
    }

    fn entry(self) -> &'static (SamplerField, &'static str, FieldSetter) {
        match self {
            Self::Absolute => &FIELD_TABLE[0],
            Self::Fill => &FIELD_TABLE[1],
            Self::Gain => &FIELD_TABLE[2],
        }
    }
}

fn set_absolute(sampler: &mut LutSampler, value: FieldValue) -> Result<(), LutError> {
    let FieldValue::Bool(absolute) = value else {
        return Err(mismatch(SamplerField::Absolute, "boolean"));
    };
    sampler.set_absolute(absolute);
    Ok(())
}

fn set_fill(sampler: &mut LutSampler, value: FieldValue) -> Result<(), LutError> {
    let FieldValue::Scalar(level) = value else {
        return Err(mismatch(SamplerField::Fill, "scalar"));
    };
    sampler.table_mut().fill(level);
    Ok(())
}

fn set_gain(sampler: &mut LutSampler, value: FieldValue) -> Result<(), LutError> {
    let FieldValue::Scalar(gain) = value else {
        return Err(mismatch(SamplerField::Gain, "scalar"));
    };
    sampler.table_mut().scale(gain);
    Ok(())
}

fn mismatch(field: SamplerField, expected: &'static str) -> LutError {
    LutError::FieldValueMismatch {
        field: field.name(),
        expected,
    }
}
