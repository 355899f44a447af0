mod axis_locator;
mod chromatogram_extractor;
mod spectrum;

pub use axis_locator::AxisLocator;
pub use chromatogram_extractor::{
    extract_chromatogram,
    extraction_row_span,
};
pub use spectrum::{
    Spectrum,
    spectrum_at_rt,
};
