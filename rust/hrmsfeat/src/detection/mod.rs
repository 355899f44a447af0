//! Prominence based peak detection on 1-D traces.
//!
//! Local maxima are found the same way regardless of the caller
//! ([`find_local_maxima`]), chromatographic peaks additionally go
//! through a width gate and a median-relative prominence gate
//! ([`PeakDetector`]).

mod local_maxima;
mod peak_detector;

pub use local_maxima::{
    Prominence,
    find_local_maxima,
    peak_prominences,
    peak_widths,
};
pub use peak_detector::{
    DetectedPeak,
    PeakDetector,
};
