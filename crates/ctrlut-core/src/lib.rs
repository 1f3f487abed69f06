//! ctrlut core: domain layer for editing material look-up tables.
//!
//! A document owns a [`LutRegistry`] of named [`LutTable`]s, each holding
//! named [`LutSampler`]s whose payload is a 256-entry scalar function. Samplers
//! can be edited numerically or round-tripped through a 512-wide grayscale
//! [`Raster`] via the [`codec`]. Every edit keeps the renderer's LUT maps
//! consistent through the [`RenderBridge`]. No file I/O lives here.

pub mod batch;
pub mod codec;
pub mod config;
pub mod confirm;
pub mod error;
pub mod naming;
pub mod raster;
pub mod registry;
pub mod render;
pub mod sampler;
pub mod table;

// Re-exports for convenience.
pub use batch::{FieldValue, SamplerField};
pub use codec::{Domain, PairPolicy, RASTER_WIDTH, TABLE_LEN};
pub use config::EditorConfig;
pub use confirm::{Confirm, Removal};
pub use error::LutError;
pub use raster::Raster;
pub use registry::LutRegistry;
pub use render::{RenderBridge, RenderLut};
pub use sampler::{LutSampler, SamplerFlags, SamplerTable};
pub use table::{LutTable, TableEditor};
