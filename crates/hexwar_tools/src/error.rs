//! Tool error types.

use thiserror::Error;

use hexwar_core::error::CoreError;

/// Errors reported by the development tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Filesystem access failed.
    #[error("Cannot read {path}: {source}")]
    Io {
        /// Path being read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// One or more data files failed to load.
    #[error("{} data file(s) failed validation", failures.len())]
    Invalid {
        /// One message per failing file.
        failures: Vec<String>,
    },

    /// Chassis name not recognised.
    #[error("Unknown chassis: {0}")]
    UnknownChassis(String),

    /// Error from the core crate.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// JSON output failed.
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;
