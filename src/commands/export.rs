//! Json command implementation.
//!
//! Builds an index from a profile and exports its hot lines as JSON,
//! either to a file or to stdout.

use super::load_index;
use super::models::JsonArgs;
use crate::index::IndexConfig;
use crate::output::{build_export, write_export, write_export_to};
use anyhow::{bail, Context, Result};
use log::info;
use std::io::Write;

/// Execute the json command
///
/// **Public** - main entry point called from main.rs
///
/// Writes to `args.output` when set, otherwise to `out`.
pub fn execute_json(args: &JsonArgs, out: impl Write) -> Result<()> {
    let mut config = IndexConfig::new().with_threshold(args.threshold);
    if let Some(prefix) = &args.trim_prefix {
        config = config.with_trim_prefix(prefix.clone());
    }

    let index = load_index(&args.profile, config)?;
    let export = build_export(&index, args.value_format);

    info!(
        "Exporting {} files as {}",
        export.files.len(),
        args.value_format
    );

    match &args.output {
        Some(path) => write_export(&export, path).context("Failed to write heatmap")?,
        None => write_export_to(&export, out).context("Failed to write heatmap")?,
    }

    Ok(())
}

/// Validate json arguments before doing any work
///
/// **Public** - called before execute_json
pub fn validate_json_args(args: &JsonArgs) -> Result<()> {
    if !args.profile.exists() {
        bail!("Profile file not found: {}", args.profile.display());
    }

    if !(args.threshold > 0.0 && args.threshold <= 1.0) {
        bail!("Threshold must be in (0, 1], got {}", args.threshold);
    }

    if let Some(output) = &args.output {
        if output.is_dir() {
            bail!("Output path is a directory: {}", output.display());
        }
    }

    Ok(())
}
