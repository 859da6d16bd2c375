//! Configuration and constants for the index and the CLI.

/// Threshold used when none is configured: the top 50% of points are hot
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Hottest level a data point can get; 0 means cold
pub const MAX_HEAT_LEVEL: u8 = 5;

/// Windows with at most this many points are searched linearly
pub const LINEAR_SCAN_MAX_POINTS: usize = 4;

/// The only sample value kind the index classifies (second value slot)
pub const CPU_SAMPLE_TYPE: &str = "cpu";
pub const CPU_SAMPLE_UNIT: &str = "nanoseconds";

/// Number of value slots a supported profile carries per sample
pub const SAMPLE_VALUE_COUNT: usize = 2;

/// Current JSON export schema version
pub const SCHEMA_VERSION: &str = "1.0.0";
