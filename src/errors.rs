use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for telemetry extraction, decoding, and output failures.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("input '{}' does not exist", .path.display())]
    InputNotFound { path: PathBuf },
    #[error("line {line}: malformed timestamp '{raw}': {reason}")]
    MalformedTimestamp {
        line: usize,
        raw: String,
        reason: String,
    },
    #[error("array '{}' could not be decoded: {details}", .path.display())]
    MalformedArray { path: PathBuf, details: String },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
