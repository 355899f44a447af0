use std::ops::Range;

use hrmsquery::{
    AxisLocator,
    IntensityMatrix,
};
use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    instrument,
};

use crate::detection::PeakDetector;
use crate::utils::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingConfig {
    /// Width of the mass bins scanned for peaks.
    pub axis_ppm: f64,
    /// Tolerance used when re-extracting a peak for qualification.
    pub extraction_ppm: f64,
    pub prominence_threshold: f64,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            axis_ppm: 50.0,
            extraction_ppm: 50.0,
            prominence_threshold: 15.0,
        }
    }
}

/// Peak found in the summed trace of one mass bin.
///
/// Retention time is rounded to 2 decimals, mass to 4 and intensity to an
/// integer value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPeak {
    pub retention_time: f64,
    pub mass: f64,
    pub intensity: f64,
}

/// Peaks of a single bin of mass rows.
///
/// The rows are summed into one trace for detection. For each detected
/// retention time the reported intensity is the largest single-row value
/// at that time and the mass is the mass of that row (the first one on ties).
pub fn pick_bin(matrix: &IntensityMatrix, rows: Range<usize>, detector: &PeakDetector) -> Vec<RawPeak> {
    if rows.is_empty() {
        return Vec::new();
    }
    let trace = matrix.sum_mass_rows(rows.clone());
    let peaks = detector.detect(&trace);

    let rt_axis = matrix.rt_axis();
    let mass_axis = matrix.mass_axis();
    peaks
        .iter()
        .map(|p| {
            let (best_row, best_value) = rows.clone().fold(
                (rows.start, f32::MIN),
                |(best_row, best_value), mi| {
                    let v = matrix.intensity(mi, p.index);
                    if v > best_value {
                        (mi, v)
                    } else {
                        (best_row, best_value)
                    }
                },
            );
            RawPeak {
                retention_time: round_to(rt_axis[p.index], 2),
                mass: round_to(mass_axis[best_row], 4),
                intensity: round_to(best_value as f64, 0),
            }
        })
        .collect()
}

/// Peaks of every ppm-scaled mass bin of the matrix.
///
/// Bins are processed in parallel, the result lists them in bin order.
#[instrument(skip_all)]
pub fn pick_raw_peaks(matrix: &IntensityMatrix, config: &PickingConfig) -> Vec<RawPeak> {
    let locator = AxisLocator::new(matrix.mass_axis(), config.axis_ppm);
    let detector = PeakDetector::new(config.prominence_threshold);
    let bins: Vec<Range<usize>> = locator.bins().collect();

    let peaks: Vec<RawPeak> = bins
        .par_iter()
        .flat_map_iter(|bin| pick_bin(matrix, bin.clone(), &detector))
        .collect();
    debug!("Picked {} raw peaks from {} bins", peaks.len(), bins.len());
    peaks
}
