pub mod base;
pub mod chromatogram;
pub mod intensity_matrix;

pub use base::Array2D;
pub use chromatogram::Chromatogram;
pub use intensity_matrix::IntensityMatrix;
