//! Error types for the roadstats library.
//!
//! Only loading and configuration can fail. Inference, filtering and the
//! statistics routines are total and never return these errors.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for roadstats operations.
#[derive(Debug, Error)]
pub enum RoadstatsError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File format not supported (workbooks, geometry files).
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no rows to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for roadstats operations.
pub type Result<T> = std::result::Result<T, RoadstatsError>;
