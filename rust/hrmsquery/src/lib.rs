#![doc = include_str!("../README.md")]

// Re-export main structures
pub use crate::extraction::{
    AxisLocator,
    Spectrum,
    extract_chromatogram,
    spectrum_at_rt,
};
pub use crate::models::{
    Array2D,
    Chromatogram,
    IntensityMatrix,
};

// Declare modules
pub mod errors;
pub mod extraction;
pub mod models;
pub mod serde;
pub mod utils;
pub use crate::utils::TupleRange;

// Re-export errors
pub use crate::errors::{
    DataReadingError,
    DataShapeError,
};
