//! Compact heatmap index.
//!
//! This module holds:
//! - The packed data model (data points, function records, keys)
//! - The `Index` itself with its point, range and traversal queries
//! - The memory footprint estimator

pub mod data;
pub mod heatmap;
mod memory;

// Re-export main types
pub use data::{DataPoint, DataPointFlags, FunctionKey, FunctionRecord, HeatLevel, LineStats};
pub use heatmap::{FuncInfo, Index, IndexConfig, LineRecord};
pub(crate) use heatmap::IndexData;
