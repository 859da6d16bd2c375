//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod export;
pub mod models;
pub mod stat;

// Re-export main command functions
pub use export::{execute_json, validate_json_args};
pub use models::{JsonArgs, StatArgs};
pub use stat::{execute_stat, validate_stat_args};

use crate::index::{Index, IndexConfig};
use crate::parser::read_profile;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

/// Read a profile from disk and build a populated index from it
///
/// **Public** - shared by every command that needs an index
pub fn load_index(path: &Path, config: IndexConfig) -> Result<Index> {
    let start_time = Instant::now();

    info!("Reading profile: {}", path.display());
    let profile = read_profile(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;

    debug!(
        "Profile has {} sample types, {} samples",
        profile.sample_types.len(),
        profile.samples.len()
    );

    let mut index = Index::new(config).context("Invalid index configuration")?;
    index
        .add_profile(&profile)
        .context("Failed to build heatmap index")?;

    info!(
        "Indexed {} functions, {} lines in {:.2?}",
        index.num_functions(),
        index.num_points(),
        start_time.elapsed()
    );

    Ok(index)
}
