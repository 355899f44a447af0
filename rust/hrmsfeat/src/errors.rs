use hrmsquery::errors::{
    DataReadingError,
    DataShapeError,
};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HrmsFeatError {
    #[error(transparent)]
    DataShape(#[from] DataShapeError),

    #[error(transparent)]
    DataReading(#[from] DataReadingError),

    #[error(transparent)]
    Alignment(#[from] AlignmentError),

    #[error("I/O error on {path}: {source}")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("CSV error on {path}: {source}")]
    Csv { source: csv::Error, path: PathBuf },

    #[error("JSON error on {path}: {source}")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },
}

pub type Result<T> = std::result::Result<T, HrmsFeatError>;

/// Violations of the alignment bookkeeping.
///
/// These are never recoverable: after the completeness backfill every
/// pooled peak has a reference feature, so hitting one means the
/// reference list and the per-file tables disagree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignmentError {
    #[error("peak at rt {retention_time}, mass {mass} matches no reference feature")]
    OrphanPeak { retention_time: f64, mass: f64 },
}
