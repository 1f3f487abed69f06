use std::path::PathBuf;

use ctrlut_core::LutError;

/// Failure reported by a binary container collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("failed to decode container: {0}")]
    Decode(String),
    #[error("failed to encode container: {0}")]
    Encode(String),
    #[error("binary LUT containers are not supported by this build")]
    Unsupported,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from path-driven LUT import and export.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error(transparent)]
    Lut(#[from] LutError),
    #[error("failed to decode image: {0}")]
    Image(image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid LUT JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error("unsupported file type for this operation: {}", .0.display())]
    UnsupportedExtension(PathBuf),
}
