//! Path selection for interactive import/export.

use std::path::PathBuf;

/// One entry of a file-type filter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    /// Filter named after its single extension.
    pub fn extension(ext: &str) -> Self {
        Self {
            name: ext.to_string(),
            extensions: vec![ext.to_string()],
        }
    }
}

/// Asks the user for a path. `None` means the selection was cancelled.
pub trait PathPicker {
    fn pick_open(&mut self, suggested_name: &str, filters: &[FileFilter]) -> Option<PathBuf>;

    fn pick_save(&mut self, suggested_name: &str, filters: &[FileFilter]) -> Option<PathBuf>;
}

/// Native file dialogs.
#[cfg(feature = "dialog")]
#[derive(Debug, Default)]
pub struct DialogPicker;

#[cfg(feature = "dialog")]
impl DialogPicker {
    fn dialog(suggested_name: &str, filters: &[FileFilter]) -> rfd::FileDialog {
        let mut d = rfd::FileDialog::new().set_file_name(suggested_name);
        for filter in filters {
            d = d.add_filter(filter.name.as_str(), &filter.extensions);
        }
        d
    }
}

#[cfg(feature = "dialog")]
impl PathPicker for DialogPicker {
    fn pick_open(&mut self, suggested_name: &str, filters: &[FileFilter]) -> Option<PathBuf> {
        Self::dialog(suggested_name, filters).pick_file()
    }

    fn pick_save(&mut self, suggested_name: &str, filters: &[FileFilter]) -> Option<PathBuf> {
        Self::dialog(suggested_name, filters).save_file()
    }
}
