//! Path-driven replace, export and import of tables and samplers.
//!
//! The target's extension picks the codec: the binary container for the
//! native extension, JSON for `.json`, and the raster codec for images
//! (samplers only). Every read and decode completes before the registry or
//! table is touched, so a failed operation leaves the document unchanged.

use std::path::Path;

use ctrlut_core::{
    EditorConfig, LutError, LutRegistry, LutSampler, LutTable, SamplerFlags, TableEditor,
};

use crate::container::{BinaryContainer, read_json, write_json};
use crate::error::FileError;
use crate::format::FileKind;
use crate::picker::{FileFilter, PathPicker};
use crate::raster_file::{load_raster, save_raster};

/// Suggested name when importing a table into the folder.
const FOLDER_IMPORT_NAME: &str = "Look Ups";

/// File operations bound to a binary container implementation.
pub struct LutFiles<'c> {
    container: &'c dyn BinaryContainer,
}

impl<'c> LutFiles<'c> {
    pub fn new(container: &'c dyn BinaryContainer) -> Self {
        Self { container }
    }

    /// Decode a whole table from a binary container or JSON file.
    pub fn read_table(&self, path: &Path, config: &EditorConfig) -> Result<LutTable, FileError> {
        match FileKind::detect(path, &config.binary_extension)? {
            FileKind::Binary => Ok(self.container.load_table(path)?),
            FileKind::Json => read_json(path),
            FileKind::Raster(_) => Err(FileError::UnsupportedExtension(path.to_path_buf())),
        }
    }

    pub fn write_table(
        &self,
        path: &Path,
        table: &LutTable,
        config: &EditorConfig,
    ) -> Result<(), FileError> {
        match FileKind::detect(path, &config.binary_extension)? {
            FileKind::Binary => Ok(self.container.save_table(path, table)?),
            FileKind::Json => write_json(path, table),
            FileKind::Raster(_) => Err(FileError::UnsupportedExtension(path.to_path_buf())),
        }
    }

    /// Decode a sampler. Rasters become signed-domain samplers named after
    /// the file stem.
    pub fn read_sampler(
        &self,
        path: &Path,
        config: &EditorConfig,
    ) -> Result<LutSampler, FileError> {
        match FileKind::detect(path, &config.binary_extension)? {
            FileKind::Binary => Ok(self.container.load_sampler(path)?),
            FileKind::Json => read_json(path),
            FileKind::Raster(_) => {
                let raster = load_raster(path)?;
                let sampler = LutSampler::from_raster(
                    file_stem(path),
                    SamplerFlags::default(),
                    &raster,
                    config.pair_policy,
                )
                .inspect_err(|e| {
                    tracing::warn!(path = %path.display(), "rejected LUT raster: {e}");
                })?;
                Ok(sampler)
            }
        }
    }

    /// Write a sampler; images are `config.export_height` rows tall.
    pub fn write_sampler(
        &self,
        path: &Path,
        sampler: &LutSampler,
        config: &EditorConfig,
    ) -> Result<(), FileError> {
        match FileKind::detect(path, &config.binary_extension)? {
            FileKind::Binary => Ok(self.container.save_sampler(path, sampler)?),
            FileKind::Json => write_json(path, sampler),
            FileKind::Raster(_) => save_raster(path, &sampler.export_raster(config.export_height)),
        }
    }

    /// Import a table file into the registry. Returns the assigned name.
    pub fn import_table(
        &self,
        registry: &mut LutRegistry,
        path: &Path,
    ) -> Result<String, FileError> {
        let table = self.read_table(path, registry.config())?;
        let name = registry.import(table);
        tracing::info!(path = %path.display(), table = %name, "imported LUT table file");
        Ok(name)
    }

    /// Replace the samplers of table `name` with those stored at `path`.
    pub fn replace_table(
        &self,
        registry: &mut LutRegistry,
        name: &str,
        path: &Path,
    ) -> Result<(), FileError> {
        if registry.table(name).is_none() {
            return Err(LutError::UnknownTable(name.to_string()).into());
        }
        let table = self.read_table(path, registry.config())?;
        registry.replace(name, table)?;
        Ok(())
    }

    pub fn export_table(
        &self,
        registry: &LutRegistry,
        name: &str,
        path: &Path,
    ) -> Result<(), FileError> {
        let table = registry
            .table(name)
            .ok_or_else(|| LutError::UnknownTable(name.to_string()))?;
        self.write_table(path, table, registry.config())?;
        tracing::info!(path = %path.display(), table = name, "exported LUT table");
        Ok(())
    }

    /// Import a sampler file into the edited table. Returns the assigned name.
    pub fn import_sampler(
        &self,
        editor: &mut TableEditor<'_>,
        path: &Path,
    ) -> Result<String, FileError> {
        let sampler = self.read_sampler(path, editor.config())?;
        Ok(editor.add_sampler(sampler))
    }

    /// Replace sampler `name` from `path`.
    ///
    /// Rasters are decoded with the sampler's current flags; containers
    /// replace flags and table together. The name is kept either way.
    pub fn replace_sampler(
        &self,
        editor: &mut TableEditor<'_>,
        name: &str,
        path: &Path,
    ) -> Result<(), FileError> {
        let config = editor.config();
        match FileKind::detect(path, &config.binary_extension)? {
            FileKind::Raster(_) => {
                let raster = load_raster(path)?;
                editor.replace_sampler_raster(name, &raster)?;
            }
            FileKind::Binary | FileKind::Json => {
                let sampler = self.read_sampler(path, config)?;
                editor.replace_sampler(name, sampler)?;
            }
        }
        Ok(())
    }

    pub fn export_sampler(
        &self,
        table: &LutTable,
        name: &str,
        path: &Path,
        config: &EditorConfig,
    ) -> Result<(), FileError> {
        let sampler = table.sampler(name).ok_or_else(|| LutError::UnknownSampler {
            table: table.name().to_string(),
            sampler: name.to_string(),
        })?;
        self.write_sampler(path, sampler, config)?;
        tracing::info!(path = %path.display(), sampler = name, "exported LUT sampler");
        Ok(())
    }

    /// Interactive [`Self::import_table`]. `Ok(None)` when the pick is cancelled.
    pub fn import_table_with(
        &self,
        registry: &mut LutRegistry,
        picker: &mut dyn PathPicker,
    ) -> Result<Option<String>, FileError> {
        let filters = table_filters(registry.config(), true);
        let Some(path) = picker.pick_open(&format!("{FOLDER_IMPORT_NAME}.json"), &filters) else {
            return Ok(cancelled("import table"));
        };
        self.import_table(registry, &path).map(Some)
    }

    pub fn replace_table_with(
        &self,
        registry: &mut LutRegistry,
        name: &str,
        picker: &mut dyn PathPicker,
    ) -> Result<Option<()>, FileError> {
        let config = registry.config();
        let filters = table_filters(config, false);
        let suggested = format!("{name}.{}", config.binary_extension);
        let Some(path) = picker.pick_open(&suggested, &filters) else {
            return Ok(cancelled("replace table"));
        };
        self.replace_table(registry, name, &path).map(Some)
    }

    pub fn export_table_with(
        &self,
        registry: &LutRegistry,
        name: &str,
        picker: &mut dyn PathPicker,
    ) -> Result<Option<()>, FileError> {
        let config = registry.config();
        let suggested = format!("{name}.{}", config.binary_extension);
        let Some(path) = picker.pick_save(&suggested, &table_filters(config, false)) else {
            return Ok(cancelled("export table"));
        };
        self.export_table(registry, name, &path).map(Some)
    }

    pub fn import_sampler_with(
        &self,
        editor: &mut TableEditor<'_>,
        picker: &mut dyn PathPicker,
    ) -> Result<Option<String>, FileError> {
        let suggested = format!("{}.png", editor.config().default_sampler_name);
        let Some(path) = picker.pick_open(&suggested, &[FileFilter::extension("png")]) else {
            return Ok(cancelled("import sampler"));
        };
        self.import_sampler(editor, &path).map(Some)
    }

    pub fn replace_sampler_with(
        &self,
        editor: &mut TableEditor<'_>,
        name: &str,
        picker: &mut dyn PathPicker,
    ) -> Result<Option<()>, FileError> {
        let filters = [FileFilter::extension("png")];
        let Some(path) = picker.pick_open(&format!("{name}.png"), &filters) else {
            return Ok(cancelled("replace sampler"));
        };
        self.replace_sampler(editor, name, &path).map(Some)
    }

    pub fn export_sampler_with(
        &self,
        table: &LutTable,
        name: &str,
        config: &EditorConfig,
        picker: &mut dyn PathPicker,
    ) -> Result<Option<()>, FileError> {
        let filters = [FileFilter::extension("png")];
        let Some(path) = picker.pick_save(&format!("{name}.png"), &filters) else {
            return Ok(cancelled("export sampler"));
        };
        self.export_sampler(table, name, &path, config).map(Some)
    }
}

fn table_filters(config: &EditorConfig, json_first: bool) -> Vec<FileFilter> {
    let binary = FileFilter::extension(&config.binary_extension);
    let json = FileFilter::extension("json");
    if json_first {
        vec![json, binary]
    } else {
        vec![binary, json]
    }
}

fn cancelled<T>(action: &str) -> Option<T> {
    tracing::warn!(action, "file selection cancelled");
    None
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|stem| stem.to_str()).unwrap_or_default()
}
