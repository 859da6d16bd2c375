//! JSON heatmap export.
//!
//! Exports every hot line (non-zero local level) of an index, grouped by
//! file, in a compact form editors can overlay directly:
//!
//! ```json
//! { "version": "1.0.0", "generated_at": "...",
//!   "files": [ { "name": "/src/main.go", "lines": [[12, 5, 4, 3200]] } ] }
//! ```
//!
//! Each line entry is `[line, local level, global level, value]`.

use crate::index::Index;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Unit values are exported in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueFormat {
    Nanoseconds,
    #[default]
    Microseconds,
    Milliseconds,
}

impl ValueFormat {
    /// Nanoseconds per exported unit
    pub fn divisor(self) -> i64 {
        match self {
            ValueFormat::Nanoseconds => 1,
            ValueFormat::Microseconds => 1_000,
            ValueFormat::Milliseconds => 1_000_000,
        }
    }

    pub fn scale(self, value: i64) -> i64 {
        value / self.divisor()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueFormat::Nanoseconds => "cpu/nanoseconds",
            ValueFormat::Microseconds => "cpu/microseconds",
            ValueFormat::Milliseconds => "cpu/milliseconds",
        }
    }
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu/nanoseconds" => Ok(ValueFormat::Nanoseconds),
            "cpu/microseconds" => Ok(ValueFormat::Microseconds),
            "cpu/milliseconds" => Ok(ValueFormat::Milliseconds),
            other => Err(format!("unexpected value format: {}", other)),
        }
    }
}

/// Exported heatmap document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapExport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Unit of every exported value
    pub value_format: String,

    /// Timestamp when the export was generated
    pub generated_at: String,

    /// Files sorted by name
    pub files: Vec<FileHeatmap>,
}

/// Hot lines of one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileHeatmap {
    pub name: String,

    /// Sorted by line number
    pub lines: Vec<ExportLine>,
}

/// `[line, local level, global level, value]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportLine(pub u32, pub u8, pub u8, pub i64);

/// Collect every hot line of the index into an export document
///
/// **Public** - main entry point for JSON export
///
/// Lines with local level 0, or whose value scales down to 0 in the
/// requested unit, are left out.
pub fn build_export(index: &Index, format: ValueFormat) -> HeatmapExport {
    let mut by_file: BTreeMap<String, Vec<ExportLine>> = BTreeMap::new();

    index.inspect(|record| {
        let stats = &record.stats;
        if stats.local_level == 0 {
            return;
        }
        let value = format.scale(stats.value);
        if value == 0 {
            return;
        }
        by_file
            .entry(record.func.file_name.to_string())
            .or_default()
            .push(ExportLine(stats.line, stats.local_level, stats.global_level, value));
    });

    let files: Vec<FileHeatmap> = by_file
        .into_iter()
        .map(|(name, mut lines)| {
            lines.sort_by_key(|line| line.0);
            FileHeatmap { name, lines }
        })
        .collect();

    debug!("Exporting {} files", files.len());

    HeatmapExport {
        version: SCHEMA_VERSION.to_string(),
        value_format: format.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        files,
    }
}

/// Serialize an export document as pretty JSON into any writer
pub fn write_export_to(export: &HeatmapExport, writer: impl Write) -> Result<(), OutputError> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, export)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write an export document to a JSON file
///
/// **Public** - used by the `json` command when an output path is given
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_export(export: &HeatmapExport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing heatmap to: {}", output_path.display());

    super::validate_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
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

    let file = File::create(output_path)?;
    write_export_to(export, file)?;

    info!(
        "Heatmap written successfully ({} bytes)",
        std::fs::metadata(output_path).map(|m| m.len()).unwrap_or(0)
    );

    Ok(())
}

/// Read an export document back from a JSON file
pub fn read_export(input_path: impl AsRef<Path>) -> Result<HeatmapExport, OutputError> {
    let file = File::open(input_path.as_ref())?;
    let export = serde_json::from_reader(file)?;
    Ok(export)
}
