//! Input schema for decoded CPU profiles.
//!
//! This is the shape a profile decoder hands to the index: a list of sample
//! value types and a list of samples, each with its call stack already
//! symbolized into `(function, file, line)` frames.

use serde::{Deserialize, Serialize};

/// Describes one slot of every sample's value vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueType {
    /// Value kind, e.g. "samples" or "cpu"
    #[serde(rename = "type")]
    pub kind: String,

    /// Value unit, e.g. "count" or "nanoseconds"
    pub unit: String,
}

impl ValueType {
    pub fn new(kind: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            unit: unit.into(),
        }
    }
}

/// A single source location in a call stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Raw (compiled) function name, e.g. "github.com/x/pkg.(*T).Run"
    pub function: String,

    /// Source file path as recorded by the profiler
    pub file: String,

    /// Source line number
    pub line: i64,
}

impl Frame {
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: i64) -> Self {
        Self {
            function: function.into(),
            file: file.into(),
            line,
        }
    }
}

/// One profiling event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// One value per profile sample type
    pub values: Vec<i64>,

    /// Call stack, innermost frame first
    #[serde(default)]
    pub frames: Vec<Frame>,
}

/// A decoded profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Meaning of every slot in `Sample::values`
    pub sample_types: Vec<ValueType>,

    #[serde(default)]
    pub samples: Vec<Sample>,
}
