//! Shared fixtures for integration tests.

#![allow(dead_code)]

use perf_heatmap::parser::{Frame, Profile, Sample, ValueType};
use perf_heatmap::{Index, IndexConfig};
use std::path::{Path, PathBuf};

/// Builder for CPU profiles with `[samples/count, cpu/nanoseconds]` values
#[derive(Debug, Default)]
pub struct ProfileBuilder {
    samples: Vec<Sample>,
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample; `frames` run from the innermost frame outwards
    pub fn sample(mut self, value: i64, frames: &[(&str, &str, i64)]) -> Self {
        self.samples.push(Sample {
            values: vec![1, value],
            frames: frames
                .iter()
                .map(|&(function, file, line)| Frame::new(function, file, line))
                .collect(),
        });
        self
    }

    pub fn build(self) -> Profile {
        Profile {
            sample_types: vec![
                ValueType::new("samples", "count"),
                ValueType::new("cpu", "nanoseconds"),
            ],
            samples: self.samples,
        }
    }
}

/// Build a populated index, panicking on failure
pub fn index_with(threshold: f64, profile: &Profile) -> Index {
    let config = IndexConfig::new().with_threshold(threshold);
    let mut index = Index::new(config).unwrap();
    index.add_profile(profile).unwrap();
    index
}

/// A small two-file profile used by the output and command tests
pub fn sample_profile() -> Profile {
    ProfileBuilder::new()
        .sample(
            3_000_000,
            &[
                ("main.parse", "/src/app/parser.go", 20),
                ("main.main", "/src/app/main.go", 10),
            ],
        )
        .sample(
            1_000_000,
            &[
                ("main.parse", "/src/app/parser.go", 21),
                ("main.main", "/src/app/main.go", 10),
            ],
        )
        .sample(
            500,
            &[
                ("main.(*Server).handle", "/src/app/server.go", 5),
                ("main.main", "/src/app/main.go", 11),
            ],
        )
        .build()
}

/// Write a profile as JSON into `dir` and return its path
pub fn write_profile(dir: &Path, profile: &Profile) -> PathBuf {
    let path = dir.join("cpu.json");
    let json = serde_json::to_string_pretty(profile).unwrap();
    std::fs::write(&path, json).unwrap();
    path
}
