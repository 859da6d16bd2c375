//! Build index data from decoded profile samples.
//!
//! Aggregation runs in two phases:
//! 1. Accumulate: every resolvable stack frame adds the sample value to a
//!    per-(function, line) point held in a mutable arena of function
//!    accumulators.
//! 2. Finish: sort files and functions, flatten every function's points
//!    into one shared array, then assign local and global heat levels.
//!
//! Nothing is visible to index readers until `finish` returns the frozen
//! [`IndexData`].

use super::buckets::{for_each_level, hotter_first};
use crate::index::{DataPoint, FunctionKey, FunctionRecord, IndexConfig, IndexData};
use crate::parser::{Frame, Profile, ResolvedSymbol, Sample, SymbolResolver};
use crate::utils::config::{CPU_SAMPLE_TYPE, CPU_SAMPLE_UNIT, SAMPLE_VALUE_COUNT};
use crate::utils::error::IndexError;
use log::{debug, warn};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Data points are addressed with 32-bit offsets
pub(crate) const MAX_DATA_POINTS: u64 = u32::MAX as u64;

/// Aggregate a whole profile into frozen index data
///
/// **Public** - main entry point used by `Index::add_profile`
///
/// # Errors
/// * `IndexError::UnsupportedProfile` - Sample types are not `[_, cpu/nanoseconds]`
/// * `IndexError::NoSamples` - No frame could be attributed to a function line
/// * `IndexError::TooManyDataPoints` - More than `max_points` distinct lines
pub(crate) fn build_index_data(
    profile: &Profile,
    config: &IndexConfig,
    resolver: &dyn SymbolResolver,
    max_points: u64,
) -> Result<IndexData, IndexError> {
    validate_sample_types(profile)?;

    debug!("Aggregating {} samples", profile.samples.len());

    let mut builder = SampleBuilder::new(config, resolver).with_point_limit(max_points);
    for sample in &profile.samples {
        builder.add_sample(sample)?;
    }
    builder.finish()
}

/// Check that the profile carries CPU time in its second value slot
fn validate_sample_types(profile: &Profile) -> Result<(), IndexError> {
    if profile.sample_types.len() != SAMPLE_VALUE_COUNT {
        return Err(IndexError::UnsupportedProfile(format!(
            "expected {} sample types, found {}",
            SAMPLE_VALUE_COUNT,
            profile.sample_types.len()
        )));
    }

    let value_type = &profile.sample_types[1];
    if value_type.kind != CPU_SAMPLE_TYPE || value_type.unit != CPU_SAMPLE_UNIT {
        return Err(IndexError::UnsupportedProfile(format!(
            "can't handle {}/{} samples",
            value_type.kind, value_type.unit
        )));
    }

    Ok(())
}

/// Function being accumulated, addressed by its provisional id
#[derive(Debug)]
struct FunctionAccumulator {
    key: FunctionKey,

    /// Full (prefix-trimmed) path of the declaring file
    file_name: String,

    min_line: u32,
    max_line: u32,

    by_line: HashMap<u32, DataPoint>,
}

impl FunctionAccumulator {
    fn new(key: FunctionKey, file_name: String) -> Self {
        Self {
            key,
            file_name,
            min_line: u32::MAX,
            max_line: 0,
            by_line: HashMap::new(),
        }
    }
}

/// Mutable aggregation state
///
/// `'p` borrows the profile being aggregated so frame lookups can be
/// cached without copying names.
pub(crate) struct SampleBuilder<'p, 'c> {
    config: &'c IndexConfig,
    resolver: &'c dyn SymbolResolver,

    funcs: Vec<FunctionAccumulator>,
    func_ids: HashMap<FunctionKey, usize>,

    /// `(raw function name, file path)` to provisional function id,
    /// `None` for frames the resolver rejected
    frame_cache: HashMap<(&'p str, &'p str), Option<usize>>,

    num_points: u64,
    max_points: u64,

    skipped_samples: usize,
    skipped_frames: usize,
}

impl<'p, 'c> SampleBuilder<'p, 'c> {
    pub fn new(config: &'c IndexConfig, resolver: &'c dyn SymbolResolver) -> Self {
        Self {
            config,
            resolver,
            funcs: Vec::new(),
            func_ids: HashMap::new(),
            frame_cache: HashMap::new(),
            num_points: 0,
            max_points: MAX_DATA_POINTS,
            skipped_samples: 0,
            skipped_frames: 0,
        }
    }

    /// Cap on distinct (function, line) points, at most [`MAX_DATA_POINTS`]
    pub fn with_point_limit(mut self, max_points: u64) -> Self {
        self.max_points = max_points.min(MAX_DATA_POINTS);
        self
    }

    /// Add one sample's value to every line of its call stack
    ///
    /// Samples with the wrong number of values are skipped. Frames that
    /// cannot be resolved or whose line does not fit 32 bits are skipped.
    ///
    /// # Errors
    /// * `IndexError::TooManyDataPoints` - A new point would exceed the 32-bit budget
    pub fn add_sample(&mut self, sample: &'p Sample) -> Result<(), IndexError> {
        if sample.values.len() != SAMPLE_VALUE_COUNT {
            self.skipped_samples += 1;
            return Ok(());
        }
        let value = sample.values[1];

        for (depth, frame) in sample.frames.iter().enumerate() {
            let Ok(line) = u32::try_from(frame.line) else {
                self.skipped_frames += 1;
                continue;
            };
            let Some(func_id) = self.resolve_frame(frame) else {
                self.skipped_frames += 1;
                continue;
            };

            let func = &mut self.funcs[func_id];
            let pt = match func.by_line.entry(line) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    if self.num_points >= self.max_points {
                        return Err(IndexError::TooManyDataPoints(self.num_points + 1));
                    }
                    self.num_points += 1;
                    entry.insert(DataPoint::new(line))
                }
            };
            pt.value = pt.value.saturating_add(value);
            if depth == 0 {
                pt.flat_value = pt.flat_value.saturating_add(value);
            }
            func.min_line = func.min_line.min(line);
            func.max_line = func.max_line.max(line);
        }

        Ok(())
    }

    /// Map a frame to its provisional function id, resolving each
    /// distinct `(function, file)` pair only once
    fn resolve_frame(&mut self, frame: &'p Frame) -> Option<usize> {
        let cache_key = (frame.function.as_str(), frame.file.as_str());
        if let Some(&cached) = self.frame_cache.get(&cache_key) {
            return cached;
        }

        let symbol = self.resolver.resolve(&frame.function);
        let func_id = if symbol.is_resolved() {
            Some(self.intern_function(symbol, &frame.file))
        } else {
            debug!("Skipping unresolved function: {}", frame.function);
            None
        };
        self.frame_cache.insert(cache_key, func_id);
        func_id
    }

    fn intern_function(&mut self, symbol: ResolvedSymbol, path: &str) -> usize {
        let file_name = self.trim_prefix(path);
        let key = FunctionKey {
            package: symbol.package,
            type_name: symbol.type_name,
            function: symbol.function,
            file: base_name(path).to_string(),
        };

        if let Some(&id) = self.func_ids.get(&key) {
            // Same key from several paths: the smallest path owns it.
            let func = &mut self.funcs[id];
            if file_name < func.file_name.as_str() {
                func.file_name = file_name.to_string();
            }
            return id;
        }

        let id = self.funcs.len();
        self.funcs
            .push(FunctionAccumulator::new(key.clone(), file_name.to_string()));
        self.func_ids.insert(key, id);
        id
    }

    fn trim_prefix<'a>(&self, path: &'a str) -> &'a str {
        self.config
            .trim_prefix
            .as_deref()
            .and_then(|prefix| path.strip_prefix(prefix))
            .unwrap_or(path)
    }

    /// Freeze the accumulated state into index data
    ///
    /// # Errors
    /// * `IndexError::NoSamples` - Nothing was accumulated
    pub fn finish(self) -> Result<IndexData, IndexError> {
        if self.skipped_samples > 0 {
            warn!("Skipped {} malformed samples", self.skipped_samples);
        }
        if self.skipped_frames > 0 {
            debug!("Skipped {} unresolvable frames", self.skipped_frames);
        }
        if self.num_points == 0 {
            return Err(IndexError::NoSamples);
        }

        let threshold = self.config.threshold;
        let num_points = self.num_points as usize;
        let mut funcs = self.funcs;

        // Step 1: sorted, deduplicated file table.
        let mut file_names: Vec<String> = funcs.iter().map(|f| f.file_name.clone()).collect();
        file_names.sort_unstable();
        file_names.dedup();
        file_names.shrink_to_fit();

        // Step 2: final function order, independent of sample order.
        funcs.sort_by(|a, b| {
            a.file_name
                .cmp(&b.file_name)
                .then_with(|| a.key.type_name.cmp(&b.key.type_name))
                .then_with(|| a.key.function.cmp(&b.key.function))
                .then_with(|| a.key.package.cmp(&b.key.package))
        });

        debug!(
            "Assembling {} data points of {} functions in {} files",
            num_points,
            funcs.len(),
            file_names.len()
        );

        // Step 3: flatten into per-function windows with local levels.
        let file_ids: HashMap<&str, u32> = file_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i as u32))
            .collect();

        let mut points: Vec<DataPoint> = Vec::with_capacity(num_points);
        let mut records = Vec::with_capacity(funcs.len());
        let mut keys = Vec::with_capacity(funcs.len());
        let mut func_ids = HashMap::with_capacity(funcs.len());

        for (id, func) in funcs.into_iter().enumerate() {
            let data_from = points.len();
            points.extend(func.by_line.into_values());

            let window = &mut points[data_from..];
            window.sort_by(hotter_first);
            let mut max_local_level = 0;
            for_each_level(window.len(), threshold, |pos, level| {
                window[pos].flags.set_local_level(level);
                max_local_level = max_local_level.max(level);
            });
            window.sort_unstable_by_key(|pt| pt.line);

            records.push(FunctionRecord {
                file_id: file_ids[func.file_name.as_str()],
                min_line: func.min_line,
                max_line: func.max_line,
                data_from: data_from as u32,
                data_to: points.len() as u32,
                max_local_level,
                max_global_level: 0,
            });
            func_ids.insert(func.key.clone(), id as u32);
            keys.push(func.key);
        }

        // Step 4: global levels over every point, regardless of window.
        let mut value_order: Vec<u32> = (0..points.len() as u32).collect();
        value_order.sort_by(|&a, &b| hotter_first(&points[a as usize], &points[b as usize]));
        for_each_level(value_order.len(), threshold, |pos, level| {
            points[value_order[pos] as usize].flags.set_global_level(level);
        });

        for record in &mut records {
            record.max_global_level = points[record.window()]
                .iter()
                .map(|pt| pt.flags.global_level())
                .max()
                .unwrap_or(0);
        }

        Ok(IndexData {
            func_ids,
            keys,
            funcs: records,
            points,
            file_names,
        })
    }
}

/// Last path element, accepting both separators
fn base_name(path: &str) -> &str {
    path.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(path)
}
