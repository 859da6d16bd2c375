//! Heatmap index and its query API.
//!
//! An [`Index`] starts empty and is populated exactly once from a decoded
//! profile. After that it is read-only: every query takes `&self`, so a
//! populated index can be shared between threads.

use super::data::{DataPoint, FunctionKey, FunctionRecord, HeatLevel, LineStats};
use crate::aggregator::sample_builder::{build_index_data, MAX_DATA_POINTS};
use crate::parser::{GoSymbolResolver, Profile, SymbolResolver};
use crate::utils::config::{DEFAULT_THRESHOLD, LINEAR_SCAN_MAX_POINTS};
use crate::utils::error::IndexError;
use log::debug;
use std::collections::HashMap;
use std::time::Instant;

/// Index configuration
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    /// Fraction of top-ranked points that get a non-zero heat level.
    ///
    /// For 0.5 it's the top 50% of the points of a function (local level)
    /// or of the whole profile (global level); 1.0 classifies everything.
    /// The hottest point always gets level 5, points past the threshold
    /// always get level 0. Must be in the (0, 1.0] range.
    pub threshold: f64,

    /// Prefix removed from file paths before they enter the file table
    pub trim_prefix: Option<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            trim_prefix: None,
        }
    }
}

impl IndexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_trim_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.trim_prefix = Some(prefix.into());
        self
    }

    /// # Errors
    /// * `IndexError::InvalidThreshold` - Threshold is NaN or outside (0, 1.0]
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.threshold > 0.0 && self.threshold <= 1.0 {
            Ok(())
        } else {
            Err(IndexError::InvalidThreshold(self.threshold))
        }
    }
}

/// Frozen index contents produced by the sample builder
#[derive(Debug, Default)]
pub(crate) struct IndexData {
    pub(crate) func_ids: HashMap<FunctionKey, u32>,

    /// Key of every function record, same order as `funcs`
    pub(crate) keys: Vec<FunctionKey>,

    /// Sorted by file, then type name, then function name
    pub(crate) funcs: Vec<FunctionRecord>,

    /// A combined storage for every function's data points.
    /// `points[f.data_from..f.data_to]` is the window of function `f`,
    /// sorted by line in ascending order.
    pub(crate) points: Vec<DataPoint>,

    /// Sorted, deduplicated
    pub(crate) file_names: Vec<String>,
}

/// Summary of the function owning a visited line
#[derive(Debug, Clone, Copy)]
pub struct FuncInfo<'a> {
    pub key: &'a FunctionKey,

    /// Full (prefix-trimmed) path of the declaring file
    pub file_name: &'a str,

    pub max_local_level: u8,
    pub max_global_level: u8,
}

/// One classified line, as emitted by [`Index::inspect`]
#[derive(Debug, Clone, Copy)]
pub struct LineRecord<'a> {
    pub stats: LineStats,
    pub func: FuncInfo<'a>,
}

/// A parsed profile that can run heatmap queries efficiently
#[derive(Debug, Default)]
pub struct Index {
    config: IndexConfig,
    data: Option<IndexData>,
}

impl Index {
    /// Create an empty index; use [`Index::add_profile`] to populate it
    ///
    /// # Errors
    /// * `IndexError::InvalidThreshold` - Threshold outside (0, 1.0]
    pub fn new(config: IndexConfig) -> Result<Self, IndexError> {
        config.validate()?;
        Ok(Self { config, data: None })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn is_populated(&self) -> bool {
        self.data.is_some()
    }

    /// Populate the index from a CPU profile, resolving Go symbol names
    ///
    /// An index can only be populated once. On any error the index is left
    /// exactly as it was.
    ///
    /// # Errors
    /// * `IndexError::AlreadyPopulated` - A profile was already added
    /// * `IndexError::UnsupportedProfile` - Not a cpu/nanoseconds profile
    /// * `IndexError::NoSamples` - No sample could be attributed to a line
    /// * `IndexError::TooManyDataPoints` - Profile exceeds 32-bit point offsets
    pub fn add_profile(&mut self, profile: &Profile) -> Result<(), IndexError> {
        self.add_profile_with(profile, &GoSymbolResolver)
    }

    /// Like [`Index::add_profile`], with a custom symbol resolver
    pub fn add_profile_with(
        &mut self,
        profile: &Profile,
        resolver: &dyn SymbolResolver,
    ) -> Result<(), IndexError> {
        self.populate(profile, resolver, MAX_DATA_POINTS)
    }

    /// The index stays untouched unless aggregation succeeds.
    fn populate(
        &mut self,
        profile: &Profile,
        resolver: &dyn SymbolResolver,
        max_points: u64,
    ) -> Result<(), IndexError> {
        if self.data.is_some() {
            return Err(IndexError::AlreadyPopulated);
        }

        let start_time = Instant::now();
        let data = build_index_data(profile, &self.config, resolver, max_points)?;
        debug!(
            "Indexed {} points of {} functions in {:.2}ms",
            data.points.len(),
            data.funcs.len(),
            start_time.elapsed().as_secs_f64() * 1000.0
        );

        self.data = Some(data);
        Ok(())
    }

    pub fn num_functions(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.funcs.len())
    }

    pub fn num_points(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.points.len())
    }

    /// Sorted names of every file that owns at least one sampled function
    pub fn collect_file_names(&self) -> Vec<String> {
        self.data
            .as_ref()
            .map_or_else(Vec::new, |d| d.file_names.clone())
    }

    pub fn has_file(&self, file_name: &str) -> bool {
        self.find_file(file_name).is_some()
    }

    /// Max local/global level of a function; zero for unknown functions
    pub fn query_func(&self, key: &FunctionKey) -> HeatLevel {
        match self.lookup(key) {
            Some((_, f)) => HeatLevel::new(f.max_local_level, f.max_global_level),
            None => HeatLevel::default(),
        }
    }

    /// Stats of a single line; zero when the line has no data
    pub fn query_line(&self, key: &FunctionKey, line: u32) -> LineStats {
        let Some((data, f)) = self.lookup(key) else {
            return LineStats::default();
        };

        // Quick range check to avoid the search.
        if line < f.min_line || line > f.max_line {
            return LineStats::default();
        }

        let window = &data.points[f.window()];
        let found = if window.len() <= LINEAR_SCAN_MAX_POINTS {
            window.iter().find(|pt| pt.line == line)
        } else {
            window
                .binary_search_by_key(&line, |pt| pt.line)
                .ok()
                .map(|i| &window[i])
        };
        found.map(LineStats::from).unwrap_or_default()
    }

    /// Visit every sampled line of a function in `[line_from, line_to]`,
    /// in ascending line order, until `visit` returns `false`
    ///
    /// A single-line range always calls `visit` exactly once with the
    /// result of [`Index::query_line`], zero stats included.
    ///
    /// # Panics
    /// If `line_from > line_to`.
    pub fn query_line_range(
        &self,
        key: &FunctionKey,
        line_from: u32,
        line_to: u32,
        mut visit: impl FnMut(&LineStats) -> bool,
    ) {
        assert!(
            line_from <= line_to,
            "invalid line range: {} > {}",
            line_from,
            line_to
        );

        if line_from == line_to {
            visit(&self.query_line(key, line_from));
            return;
        }

        let Some((data, f)) = self.lookup(key) else {
            return;
        };
        if line_to < f.min_line || line_from > f.max_line {
            return;
        }
        let line_from = line_from.max(f.min_line);
        let line_to = line_to.min(f.max_line);

        let window = &data.points[f.window()];
        let start = window.partition_point(|pt| pt.line < line_from);
        for pt in &window[start..] {
            if pt.line > line_to {
                break;
            }
            if !visit(&LineStats::from(pt)) {
                break;
            }
        }
    }

    /// Visit every classified line of the index
    ///
    /// Functions come in file/type/function order, lines in ascending
    /// order within a function.
    pub fn inspect(&self, mut visit: impl FnMut(&LineRecord<'_>)) {
        let Some(data) = &self.data else {
            return;
        };
        for func_id in 0..data.funcs.len() {
            Self::inspect_func(data, func_id, &mut visit);
        }
    }

    /// Like [`Index::inspect`], limited to the functions of one file
    pub fn inspect_file(&self, file_name: &str, mut visit: impl FnMut(&LineRecord<'_>)) {
        let (Some(data), Some(file_id)) = (&self.data, self.find_file(file_name)) else {
            return;
        };

        // Functions are sorted by file first, so a file's functions are
        // contiguous.
        let start = data.funcs.partition_point(|f| f.file_id < file_id);
        let end = data.funcs.partition_point(|f| f.file_id <= file_id);
        for func_id in start..end {
            Self::inspect_func(data, func_id, &mut visit);
        }
    }

    fn inspect_func(data: &IndexData, func_id: usize, visit: &mut impl FnMut(&LineRecord<'_>)) {
        let f = &data.funcs[func_id];
        let func = FuncInfo {
            key: &data.keys[func_id],
            file_name: &data.file_names[f.file_id as usize],
            max_local_level: f.max_local_level,
            max_global_level: f.max_global_level,
        };
        for pt in &data.points[f.window()] {
            visit(&LineRecord {
                stats: LineStats::from(pt),
                func,
            });
        }
    }

    fn lookup(&self, key: &FunctionKey) -> Option<(&IndexData, &FunctionRecord)> {
        let data = self.data.as_ref()?;
        let &id = data.func_ids.get(key)?;
        Some((data, &data.funcs[id as usize]))
    }

    fn find_file(&self, file_name: &str) -> Option<u32> {
        let data = self.data.as_ref()?;
        data.file_names
            .binary_search_by(|name| name.as_str().cmp(file_name))
            .ok()
            .map(|i| i as u32)
    }

    pub(crate) fn data(&self) -> Option<&IndexData> {
        self.data.as_ref()
    }
}
