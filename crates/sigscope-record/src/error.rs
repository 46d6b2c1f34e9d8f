use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing signature records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The record file could not be read or did not parse.
    #[error("malformed signature record {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// The record parsed but carries a format version we do not understand.
    #[error("unsupported record format {found} in {path} (supported: {supported})")]
    UnsupportedFormat {
        path: PathBuf,
        found: u32,
        supported: u32,
    },

    /// I/O error while writing a record.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for record results.
pub type RecordResult<T> = Result<T, RecordError>;
