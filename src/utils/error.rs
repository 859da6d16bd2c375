//! Error types for the entire library.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Contract violations (invalid heat level, inverted line range) are not
//! represented here: they panic at the call site.

use thiserror::Error;

/// Errors that can occur while building or populating an index
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("invalid threshold {0}: must be in (0, 1.0] range")]
    InvalidThreshold(f64),

    #[error("unsupported profile: {0}")]
    UnsupportedProfile(String),

    #[error("found no suitable samples")]
    NoSamples,

    #[error("too many data points ({0})")]
    TooManyDataPoints(u64),

    #[error("index is already populated: adding several profiles is not supported")]
    AlreadyPopulated,
}

/// Errors that can occur while reading a decoded profile
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read profile: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid profile format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
