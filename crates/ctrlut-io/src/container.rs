//! Whole-table and whole-sampler containers: the native binary form and JSON.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use ctrlut_core::{LutSampler, LutTable};

use crate::error::{ContainerError, FileError};

/// Reader/writer for the asset format's native binary LUT container.
///
/// The encoding is owned by the asset-format layer; the editor only asks for
/// decoded tables and samplers. Implementations are expected to write
/// atomically.
pub trait BinaryContainer {
    fn load_table(&self, path: &Path) -> Result<LutTable, ContainerError>;

    fn save_table(&self, path: &Path, table: &LutTable) -> Result<(), ContainerError>;

    fn load_sampler(&self, path: &Path) -> Result<LutSampler, ContainerError>;

    fn save_sampler(&self, path: &Path, sampler: &LutSampler) -> Result<(), ContainerError>;
}

/// Stand-in used when no binary container codec is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBinaryContainer;

impl BinaryContainer for NoBinaryContainer {
    fn load_table(&self, _path: &Path) -> Result<LutTable, ContainerError> {
        Err(ContainerError::Unsupported)
    }

    fn save_table(&self, _path: &Path, _table: &LutTable) -> Result<(), ContainerError> {
        Err(ContainerError::Unsupported)
    }

    fn load_sampler(&self, _path: &Path) -> Result<LutSampler, ContainerError> {
        Err(ContainerError::Unsupported)
    }

    fn save_sampler(&self, _path: &Path, _sampler: &LutSampler) -> Result<(), ContainerError> {
        Err(ContainerError::Unsupported)
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FileError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), FileError> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text)?;
    Ok(())
}
