use hrmsfeat::HrmsFeatError;
use hrmsquery::DataReadingError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Feature(#[from] HrmsFeatError),

    #[error("Data reading error: {0}")]
    DataReading(#[from] DataReadingError),

    #[error("Unable to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{} and {} both map to sample name '{}'", .first.display(), .second.display(), .sample)]
    DuplicateSample {
        sample: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("None of the {0} input files could be processed")]
    NoFilesProcessed(usize),
}
