//! Per-file pipeline: bin the mass axis, pick peaks in every bin, then
//! qualify them against the same matrix.

use std::time::{
    Duration,
    Instant,
};

use hrmsquery::IntensityMatrix;
use serde::Serialize;
use tracing::{
    info,
    instrument,
};

use super::raw_peaks::{
    PickingConfig,
    pick_raw_peaks,
};
use crate::qualification::{
    PeakQualifier,
    QualificationConfig,
    QualifiedPeak,
};

/// Time spent in each stage of [`process_matrix`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PickingTimings {
    pub picking: Duration,
    pub qualification: Duration,
}

impl Serialize for PickingTimings {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("PickingTimings", 2)?;
        state.serialize_field("picking_ms", &self.picking.as_millis())?;
        state.serialize_field("qualification_ms", &self.qualification.as_millis())?;
        state.end()
    }
}

impl std::ops::AddAssign for PickingTimings {
    fn add_assign(&mut self, rhs: Self) {
        self.picking += rhs.picking;
        self.qualification += rhs.qualification;
    }
}

#[derive(Debug, Clone)]
pub struct FilePeaks {
    pub num_raw_peaks: usize,
    /// Sorted by ascending intensity.
    pub qualified: Vec<QualifiedPeak>,
    pub timings: PickingTimings,
}

/// Pick and qualify the peaks of one intensity matrix.
#[instrument(skip_all)]
pub fn process_matrix(
    matrix: &IntensityMatrix,
    picking: &PickingConfig,
    qualification: &QualificationConfig,
) -> FilePeaks {
    let mut timings = PickingTimings::default();

    let start = Instant::now();
    let raw = pick_raw_peaks(matrix, picking);
    timings.picking = start.elapsed();

    let start = Instant::now();
    let qualifier = PeakQualifier::new(matrix, picking.extraction_ppm, *qualification);
    let qualified = qualifier.qualify(&raw);
    timings.qualification = start.elapsed();

    info!(
        "Qualified {} of {} raw peaks (picking {:?}, qualification {:?})",
        qualified.len(),
        raw.len(),
        timings.picking,
        timings.qualification
    );
    FilePeaks {
        num_raw_peaks: raw.len(),
        qualified,
        timings,
    }
}
