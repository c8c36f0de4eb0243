//! Error types for the profsel binary.

use thiserror::Error;

/// Failures outside the engine itself; parsing and suggesting never fail.
#[derive(Error, Debug)]
pub enum CliError {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
