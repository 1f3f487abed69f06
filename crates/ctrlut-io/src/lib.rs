//! File layer for ctrlut.
//!
//! Dispatches sampler and table import/export by extension: images go through
//! the raster codec in `ctrlut-core` via the `image` crate, `.json` through
//! `serde_json`, and the native binary container through a caller-supplied
//! [`BinaryContainer`]. Interactive variants take a [`PathPicker`]; enable the
//! `dialog` feature for native file dialogs.

mod container;
mod error;
mod files;
mod format;
mod picker;
mod raster_file;

pub use container::{BinaryContainer, NoBinaryContainer};
pub use error::{ContainerError, FileError};
pub use files::LutFiles;
pub use format::FileKind;
#[cfg(feature = "dialog")]
pub use picker::DialogPicker;
pub use picker::{FileFilter, PathPicker};
pub use raster_file::{load_raster, save_raster};
