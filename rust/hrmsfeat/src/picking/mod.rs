mod pipeline;
mod raw_peaks;

pub use pipeline::{
    FilePeaks,
    PickingTimings,
    process_matrix,
};
pub use raw_peaks::{
    PickingConfig,
    RawPeak,
    pick_bin,
    pick_raw_peaks,
};
