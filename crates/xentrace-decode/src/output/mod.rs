//! Output writers for decoded traces.
//!
//! - Plain-text dump (one line per record)
//! - JSON export with full decoded presentation

pub mod json;
pub mod text;

// Re-export main functions
pub use json::{build_export, read_export, write_export, ExportRecord, TraceExport};
pub use text::{write_dump, write_dump_file};

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Validate that output path is writable and create missing parents
///
/// **Private** - shared by the writers
pub(crate) fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Check if we're trying to overwrite a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
