//! perf-heatmap
//!
//! Line-level heat levels for CPU profiles.
//!
//! A profile is folded into a compact, read-only index. Every
//! (function, line) pair gets two heat levels from 0 to 5: a local
//! one ranked against the other lines of the same function and a
//! global one ranked against every line in the profile.
//!
//! ```ignore
//! use perf_heatmap::{parser::read_profile, FunctionKey, Index, IndexConfig};
//!
//! let profile = read_profile("cpu.json")?;
//! let mut index = Index::new(IndexConfig::new().with_threshold(0.5))?;
//! index.add_profile(&profile)?;
//!
//! let key = FunctionKey::new("main", "", "run", "main.go");
//! let stats = index.query_line(&key, 42);
//! println!("L={} G={}", stats.local_level, stats.global_level);
//! ```

pub mod aggregator;
pub mod commands;
pub mod index;
pub mod output;
pub mod parser;
pub mod utils;

pub use index::{FunctionKey, HeatLevel, Index, IndexConfig, LineStats};
pub use utils::error::{IndexError, OutputError, ParseError};
