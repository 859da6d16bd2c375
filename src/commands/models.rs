use crate::output::ValueFormat;
use crate::utils::config::DEFAULT_THRESHOLD;
use std::path::PathBuf;

/// Arguments for the stat command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct StatArgs {
    /// Profile JSON file to index
    pub profile: PathBuf,

    /// Fraction of each function's lines that receive a non-zero level
    pub threshold: f64,

    /// Only print functions whose file name matches this regex
    pub file_filter: Option<String>,

    /// Prefix stripped from every file path before indexing
    pub trim_prefix: Option<String>,
}

impl Default for StatArgs {
    fn default() -> Self {
        Self {
            profile: PathBuf::from("cpu.json"),
            threshold: DEFAULT_THRESHOLD,
            file_filter: None,
            trim_prefix: None,
        }
    }
}

/// Arguments for the json command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct JsonArgs {
    /// Profile JSON file to index
    pub profile: PathBuf,

    /// Fraction of each function's lines that receive a non-zero level
    pub threshold: f64,

    /// Unit of the exported values
    pub value_format: ValueFormat,

    /// Output path (None = stdout)
    pub output: Option<PathBuf>,

    /// Prefix stripped from every file path before indexing
    pub trim_prefix: Option<String>,
}

impl Default for JsonArgs {
    fn default() -> Self {
        Self {
            profile: PathBuf::from("cpu.json"),
            threshold: DEFAULT_THRESHOLD,
            value_format: ValueFormat::default(),
            output: None,
            trim_prefix: None,
        }
    }
}
