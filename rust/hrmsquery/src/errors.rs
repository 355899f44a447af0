use std::path::PathBuf;
use thiserror::Error;

/// Which of the two axes of an intensity matrix a shape problem refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Mass,
    RetentionTime,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Mass => write!(f, "mass"),
            Axis::RetentionTime => write!(f, "retention time"),
        }
    }
}

/// Malformed or empty intensity matrix.
///
/// Any of these is fatal for the file being processed, but not for the
/// rest of a batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataShapeError {
    #[error("{axis} axis is empty")]
    EmptyAxis { axis: Axis },

    #[error("{axis} axis is not strictly increasing at index {index} ({previous} -> {current})")]
    NonMonotonicAxis {
        axis: Axis,
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("{axis} axis has a non-finite value at index {index}")]
    NonFiniteAxisValue { axis: Axis, index: usize },

    #[error("expected {expected} values, got {real}")]
    ExpectedVectorLength { real: usize, expected: usize },

    #[error("row {row} has {real} values, expected {expected}")]
    RaggedRow {
        row: usize,
        real: usize,
        expected: usize,
    },

    #[error("intensity at mass row {mass_index}, rt column {rt_index} is {value}, expected finite and >= 0")]
    InvalidIntensity {
        mass_index: usize,
        rt_index: usize,
        value: f32,
    },
}

#[derive(Error, Debug)]
pub enum DataReadingError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("JSON error reading {path}: {source}")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },

    #[error("CSV error reading {path}: {source}")]
    Csv { source: csv::Error, path: PathBuf },

    #[error("malformed matrix file {path} (line {line}): {msg}")]
    Malformed {
        path: PathBuf,
        line: u64,
        msg: String,
    },

    #[error("invalid matrix in {path}: {source}")]
    Shape {
        source: DataShapeError,
        path: PathBuf,
    },
}
