//! Output writers for heatmap data.
//!
//! This module handles rendering an index in various formats:
//! - JSON heatmap export (for editors and dashboards)
//! - Text dumps (for the `stat` command)

pub mod json;
pub mod text;

// Re-export main functions
pub use json::{
    build_export, read_export, write_export, write_export_to, ExportLine, FileHeatmap,
    HeatmapExport, ValueFormat,
};
pub use text::{format_memory_usage, render_index_lines};

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
