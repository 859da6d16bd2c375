//! Stat command implementation.
//!
//! Builds an index from a profile and prints its approximate size
//! followed by every indexed line, optionally filtered by file name.

use super::load_index;
use super::models::StatArgs;
use crate::index::IndexConfig;
use crate::output::{format_memory_usage, render_index_lines};
use anyhow::{bail, Context, Result};
use regex::Regex;
use std::io::Write;

/// Execute the stat command, writing the report to `out`
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Profile read or decode failures
/// * Unsupported sample types
/// * Invalid file filter regex
pub fn execute_stat(args: &StatArgs, out: &mut impl Write) -> Result<()> {
    let filter = args
        .file_filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("Invalid file name filter")?;

    let mut config = IndexConfig::new().with_threshold(args.threshold);
    if let Some(prefix) = &args.trim_prefix {
        config = config.with_trim_prefix(prefix.clone());
    }

    let index = load_index(&args.profile, config)?;

    writeln!(out, "{}", format_memory_usage(index.memory_usage_approx()))?;
    write!(out, "{}", render_index_lines(&index, filter.as_ref()))?;
    out.flush()?;

    Ok(())
}

/// Validate stat arguments before doing any work
///
/// **Public** - called before execute_stat
pub fn validate_stat_args(args: &StatArgs) -> Result<()> {
    if !args.profile.exists() {
        bail!("Profile file not found: {}", args.profile.display());
    }

    if !(args.threshold > 0.0 && args.threshold <= 1.0) {
        bail!(
            "Threshold must be in (0, 1], got {}",
            args.threshold
        );
    }

    Ok(())
}
