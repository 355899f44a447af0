//! Scoring and filtering of raw peaks.
//!
//! Every raw peak is re-extracted from the matrix at the extraction
//! tolerance and scored on that chromatogram:
//!
//! 1. **Height**: the maximum within [`HEIGHT_HALF_WINDOW`] samples of the
//!    peak. If the maximum within [`COMPLEXITY_HALF_WINDOW`] samples is
//!    noticeably larger, something else elutes right next to the peak and
//!    both signal-to-noise values are set to `0.0`.
//! 2. **Signal to noise**: height over the background of the outer
//!    [`BACKGROUND_SAMPLES`] samples of a [`FLANK_HALF_WIDTH`] window on
//!    each side (see [`estimate_background`]).
//! 3. **Area**: Simpson integral over [`AREA_HALF_WINDOW`] samples either
//!    side, or over the whole trace when that window does not fit.
//! 4. **Refined mass**: the tallest local maximum of the spectrum at the
//!    peak's retention time, within [`REFINE_MASS_TOLERANCE`] of the peak's
//!    mass. Without one the peak gets mass `0.0` and intensity `1.0`.
//!
//! The qualified peak reports the refined mass and intensity. It is kept
//! when that intensity is above the intensity threshold and at least one
//! of the two signal-to-noise values is above the SN threshold.

use std::ops::Range;

use hrmsquery::IntensityMatrix;
use hrmsquery::extraction::extract_chromatogram;
use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    info,
    instrument,
};

use crate::background::estimate_background;
use crate::detection::find_local_maxima;
use crate::picking::RawPeak;
use crate::utils::{
    round_to,
    simpson,
};

pub const HEIGHT_HALF_WINDOW: usize = 2;
pub const COMPLEXITY_HALF_WINDOW: usize = 5;
/// Height difference between the two windows above which a peak is ambiguous.
pub const COMPLEXITY_MARGIN: f64 = 1.0;
pub const FLANK_HALF_WIDTH: usize = 150;
pub const BACKGROUND_SAMPLES: usize = 50;
pub const AREA_HALF_WINDOW: usize = 40;
/// Mass rows searched on each side of the nearest row during refinement.
pub const REFINE_HALF_ROWS: usize = 20;
pub const REFINE_MASS_TOLERANCE: f64 = 0.005;

/// Mass and intensity reported when refinement finds no spectral maximum.
pub const UNREFINED_MASS: f64 = 0.0;
pub const UNREFINED_INTENSITY: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualificationConfig {
    pub intensity_threshold: f64,
    pub sn_threshold: f64,
}

impl Default for QualificationConfig {
    fn default() -> Self {
        Self {
            intensity_threshold: 500.0,
            sn_threshold: 5.0,
        }
    }
}

/// A scored peak, one row of a per-file peak table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifiedPeak {
    pub retention_time: f64,
    pub mass: f64,
    pub intensity: f64,
    #[serde(rename = "SN_left")]
    pub sn_left: f64,
    #[serde(rename = "SN_right")]
    pub sn_right: f64,
    pub area: f64,
}

fn clipped(center: usize, before: usize, after: usize, len: usize) -> Range<usize> {
    let start = center.saturating_sub(before).min(len);
    let end = center.saturating_add(after).min(len);
    start..end
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::max)
}

/// Left and right signal to noise of the peak at `index`, rounded to one decimal.
///
/// Returns `(0.0, 0.0)` for peaks with a taller neighbour within
/// [`COMPLEXITY_HALF_WINDOW`] samples.
pub fn signal_to_noise(trace: &[f64], index: usize) -> (f64, f64) {
    let len = trace.len();
    // Both windows are inclusive of their edges.
    let peak_height = max_of(&trace[clipped(index, HEIGHT_HALF_WINDOW, HEIGHT_HALF_WINDOW + 1, len)]);
    let other_peak = max_of(
        &trace[clipped(
            index,
            COMPLEXITY_HALF_WINDOW,
            COMPLEXITY_HALF_WINDOW + 1,
            len,
        )],
    );
    if other_peak - peak_height > COMPLEXITY_MARGIN {
        return (0.0, 0.0);
    }

    let flank = &trace[clipped(index, FLANK_HALF_WIDTH, FLANK_HALF_WIDTH, len)];
    let n_bg = BACKGROUND_SAMPLES.min(flank.len());
    let bg_left = estimate_background(&flank[..n_bg]);
    let bg_right = estimate_background(&flank[flank.len() - n_bg..]);

    (
        round_to(peak_height / bg_left, 1),
        round_to(peak_height / bg_right, 1),
    )
}

/// Simpson area around `index`, truncated towards zero.
pub fn peak_area(trace: &[f64], index: usize) -> f64 {
    let fits = index >= AREA_HALF_WINDOW && index + AREA_HALF_WINDOW <= trace.len();
    let area = if fits {
        simpson(&trace[index - AREA_HALF_WINDOW..index + AREA_HALF_WINDOW])
    } else {
        simpson(trace)
    };
    area.trunc()
}

/// Tallest spectral maximum near `mass` at retention time column `rt_index`.
///
/// Returns the mass rounded to 4 decimals and the intensity rounded to an
/// integer value.
pub fn refine_mass(matrix: &IntensityMatrix, rt_index: usize, mass: f64) -> Option<(f64, f64)> {
    let center = matrix.nearest_mass_index(mass);
    let rows = clipped(center, REFINE_HALF_ROWS, REFINE_HALF_ROWS, matrix.n_mass());
    let masses = &matrix.mass_axis()[rows.clone()];
    let intensities: Vec<f64> = rows
        .map(|mi| matrix.intensity(mi, rt_index) as f64)
        .collect();

    let low = mass - REFINE_MASS_TOLERANCE;
    let high = mass + REFINE_MASS_TOLERANCE;
    let mut best: Option<(f64, f64)> = None;
    for i in find_local_maxima(&intensities) {
        if masses[i] < low || masses[i] > high {
            continue;
        }
        // Strict comparison keeps the first of equally tall maxima.
        if best.map_or(true, |(_, b)| intensities[i] > b) {
            best = Some((masses[i], intensities[i]));
        }
    }
    best.map(|(m, i)| (round_to(m, 4), round_to(i, 0)))
}

/// Scores raw peaks against the matrix they were picked from.
#[derive(Debug, Clone, Copy)]
pub struct PeakQualifier<'a> {
    matrix: &'a IntensityMatrix,
    extraction_ppm: f64,
    config: QualificationConfig,
}

impl<'a> PeakQualifier<'a> {
    pub fn new(matrix: &'a IntensityMatrix, extraction_ppm: f64, config: QualificationConfig) -> Self {
        Self {
            matrix,
            extraction_ppm,
            config,
        }
    }

    /// Score a single peak without applying the thresholds.
    pub fn score(&self, peak: &RawPeak) -> QualifiedPeak {
        let eic = extract_chromatogram(self.matrix, peak.mass, self.extraction_ppm);
        let index = self.matrix.nearest_rt_index(peak.retention_time);
        let trace = eic.intensity();

        let (sn_left, sn_right) = signal_to_noise(trace, index);
        let area = peak_area(trace, index);
        let (mass, intensity) = refine_mass(self.matrix, index, peak.mass)
            .unwrap_or((UNREFINED_MASS, UNREFINED_INTENSITY));

        QualifiedPeak {
            retention_time: peak.retention_time,
            mass,
            intensity,
            sn_left,
            sn_right,
            area,
        }
    }

    pub fn passes(&self, peak: &QualifiedPeak) -> bool {
        peak.intensity > self.config.intensity_threshold
            && (peak.sn_left > self.config.sn_threshold || peak.sn_right > self.config.sn_threshold)
    }

    /// Score, filter and sort (ascending intensity) a file's raw peaks.
    #[instrument(skip_all, fields(n_raw = peaks.len()))]
    pub fn qualify(&self, peaks: &[RawPeak]) -> Vec<QualifiedPeak> {
        let mut out: Vec<QualifiedPeak> = peaks
            .par_iter()
            .map(|p| self.score(p))
            .filter(|q| self.passes(q))
            .collect();
        out.sort_by(|a, b| a.intensity.total_cmp(&b.intensity));
        debug!("Kept {} of {} raw peaks", out.len(), peaks.len());
        if out.is_empty() && !peaks.is_empty() {
            info!("No peak passed qualification");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_with_peak(len: usize, index: usize, background: f64, height: f64) -> Vec<f64> {
        let mut trace = vec![background; len];
        trace[index] = height;
        trace[index - 1] = height / 2.0;
        trace[index + 1] = height / 2.0;
        trace
    }

    #[test]
    fn test_sn_on_flat_background() {
        let trace = flat_with_peak(1000, 500, 50.0, 5000.0);
        let (left, right) = signal_to_noise(&trace, 500);
        let expected = round_to(5000.0 / 51.0, 1);
        assert_eq!(left, expected);
        assert_eq!(right, expected);
        assert_eq!(left, 98.0);
    }

    #[test]
    fn test_coeluting_neighbour_zeroes_sn() {
        let mut trace = flat_with_peak(1000, 500, 50.0, 5000.0);
        // Taller signal 4 samples away, outside the height window
        trace[504] = 8000.0;
        assert_eq!(signal_to_noise(&trace, 500), (0.0, 0.0));
        // 3 samples away is still inside the complexity window only
        let mut trace = flat_with_peak(1000, 500, 50.0, 5000.0);
        trace[497] = 5001.5;
        assert_eq!(signal_to_noise(&trace, 500), (0.0, 0.0));
        // Within the margin is not ambiguous
        let mut trace = flat_with_peak(1000, 500, 50.0, 5000.0);
        trace[497] = 5000.5;
        assert!(signal_to_noise(&trace, 500).0 > 0.0);
    }

    #[test]
    fn test_sn_near_trace_edges() {
        // The clipped left flank starts at 0 and contains the peak itself,
        // so its background is the peak maximum.
        let trace = flat_with_peak(400, 2, 10.0, 1000.0);
        let (left, right) = signal_to_noise(&trace, 2);
        assert_eq!(left, round_to(1000.0 / 1001.0, 1));
        assert_eq!(right, round_to(1000.0 / 11.0, 1));
        assert_eq!(right, 90.9);

        let short = flat_with_peak(5, 2, 10.0, 1000.0);
        let (left, right) = signal_to_noise(&short, 2);
        assert_eq!(left, 0.0);
        assert_eq!(right, 0.0);
    }

    #[test]
    fn test_area_window_and_fallback() {
        let trace = vec![2.0; 200];
        // 80 samples, 79 unit intervals
        assert_eq!(peak_area(&trace, 100), 158.0);
        // Near the start the whole trace is integrated
        assert_eq!(peak_area(&trace, 10), 398.0);
        assert_eq!(peak_area(&trace, 160), 158.0);
        assert_eq!(peak_area(&trace, 161), 398.0);
    }

    fn spectrum_matrix() -> IntensityMatrix {
        let mass: Vec<f64> = (0..60).map(|i| (199_970 + i) as f64 / 1000.0).collect();
        let rows: Vec<Vec<f32>> = mass
            .iter()
            .map(|m| {
                let v = if (*m - 200.001).abs() < 1e-9 {
                    5000.4
                } else if (*m - 200.0).abs() < 1e-9 || (*m - 200.002).abs() < 1e-9 {
                    700.0
                } else if (*m - 200.020).abs() < 1e-9 {
                    9000.0
                } else {
                    10.0
                };
                vec![v, 0.0]
            })
            .collect();
        IntensityMatrix::from_rows(mass, vec![10.0, 10.01], rows).unwrap()
    }

    #[test]
    fn test_refine_mass() {
        let m = spectrum_matrix();
        assert_eq!(refine_mass(&m, 0, 200.0), Some((200.001, 5000.0)));
        // The taller maximum at 200.020 is searched but outside the mass window
        assert_eq!(refine_mass(&m, 0, 200.003), Some((200.001, 5000.0)));
        // Empty column
        assert_eq!(refine_mass(&m, 1, 200.0), None);
    }

    #[test]
    fn test_score_uses_refined_values() {
        let m = spectrum_matrix();
        let q = PeakQualifier::new(&m, 50.0, QualificationConfig::default());
        let scored = q.score(&RawPeak {
            retention_time: 10.01,
            mass: 200.0,
            intensity: 10.0,
        });
        assert_eq!(scored.mass, UNREFINED_MASS);
        assert_eq!(scored.intensity, UNREFINED_INTENSITY);
        assert!(!q.passes(&scored));

        let scored = q.score(&RawPeak {
            retention_time: 10.0,
            mass: 200.0,
            intensity: 700.0,
        });
        assert_eq!(scored.mass, 200.001);
        assert_eq!(scored.intensity, 5000.0);
        assert_eq!(scored.retention_time, 10.0);
    }

    #[test]
    fn test_qualify_filters_and_sorts() {
        let m = spectrum_matrix();
        let q = PeakQualifier::new(&m, 50.0, QualificationConfig::default());
        let pass = |intensity: f64, sn: f64| QualifiedPeak {
            retention_time: 1.0,
            mass: 200.0,
            intensity,
            sn_left: sn,
            sn_right: 0.0,
            area: 0.0,
        };
        assert!(q.passes(&pass(501.0, 5.1)));
        assert!(!q.passes(&pass(500.0, 50.0)));
        assert!(!q.passes(&pass(5000.0, 5.0)));
        assert!(q.qualify(&[]).is_empty());
    }
}
