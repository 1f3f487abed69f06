//! File type dispatch by extension.

use std::path::Path;

use image::ImageFormat;

use crate::error::FileError;

/// What a path's extension says about its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Native binary LUT container, handled by a [`crate::BinaryContainer`].
    Binary,
    /// JSON serialization of a table or sampler.
    Json,
    /// An image the `image` crate can read or write.
    Raster(ImageFormat),
}

impl FileKind {
    /// Classify `path` by its extension, ignoring case.
    pub fn detect(path: &Path, binary_extension: &str) -> Result<Self, FileError> {
        let unsupported = || FileError::UnsupportedExtension(path.to_path_buf());
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(unsupported)?;

        if ext.eq_ignore_ascii_case(binary_extension) {
            Ok(Self::Binary)
        } else if ext == "json" {
            Ok(Self::Json)
        } else {
            ImageFormat::from_extension(&ext)
                .map(Self::Raster)
                .ok_or_else(unsupported)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_is_case_insensitive() {
        assert_eq!(FileKind::detect(Path::new("a/Rim.BLUT"), "blut").unwrap(), FileKind::Binary);
        assert_eq!(FileKind::detect(Path::new("Rim.Json"), "blut").unwrap(), FileKind::Json);
        assert_eq!(
            FileKind::detect(Path::new("Rim.PNG"), "blut").unwrap(),
            FileKind::Raster(ImageFormat::Png)
        );
    }

    #[test]
    fn test_detect_rejects_missing_or_unknown_extension() {
        assert!(matches!(
            FileKind::detect(Path::new("Rim"), "blut"),
            Err(FileError::UnsupportedExtension(_))
        ));
        assert!(matches!(
            FileKind::detect(Path::new("Rim.xyz"), "blut"),
            Err(FileError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn test_binary_extension_is_configurable() {
        assert_eq!(FileKind::detect(Path::new("t.bcres"), "BCRES").unwrap(), FileKind::Binary);
    }
}
