// error.rs

use std::path::PathBuf;
use thiserror::Error;

pub(crate) type Result<T> = std::result::Result<T, SubsampleError>;

#[derive(Debug, Error)]
pub(crate) enum SubsampleError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV file {} has no header row", .path.display())]
    EmptyTable { path: PathBuf },

    #[error("Column '{column}' not found. Available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// Raised before any replicate is drawn, so no output is written.
    #[error("Sample size {requested} exceeds the {available} row(s) of group {group}")]
    SampleSizeExceedsGroup {
        group: String,
        requested: usize,
        available: usize,
    },
}

impl SubsampleError {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        SubsampleError::Csv { path: path.into(), source }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SubsampleError::Io { path: path.into(), source }
    }
}
