//! Aggregation of profile samples into heatmap index data.
//!
//! This module transforms decoded profiles into:
//! - Per-(function, line) value sums
//! - Local heat levels (ranked within each function)
//! - Global heat levels (ranked across the whole profile)

pub mod buckets;
pub(crate) mod sample_builder;

// Re-export main functions
pub use buckets::{for_each_chunk, for_each_level, hotter_first, top_n};
