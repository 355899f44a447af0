use serde::{
    Deserialize,
    Serialize,
};
use tracing::trace;

use super::local_maxima::{
    find_local_maxima,
    peak_prominences,
    peak_widths,
};
use crate::utils::median;

/// Maxima narrower than this (in samples, at half prominence) are never peaks.
pub const MIN_PEAK_WIDTH: f64 = 2.0;

/// A maximum that passed both the width and the prominence gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedPeak {
    pub index: usize,
    pub left_base: usize,
    pub right_base: usize,
    pub prominence: f64,
}

/// Finds the significant peaks of a trace.
///
/// Local maxima at least [`MIN_PEAK_WIDTH`] samples wide are kept as
/// candidates. A candidate is reported when its prominence exceeds
/// `prominence_threshold` times the median prominence of all candidates
/// in the same trace, so the gate follows the noise floor of each trace.
///
/// ```
/// use hrmsfeat::detection::PeakDetector;
///
/// // Low, wide ripples with one tall bump in the middle.
/// let mut trace: Vec<f64> = (0..60).map(|i| [0.0, 0.5, 1.0, 0.5][i % 4]).collect();
/// trace[29] += 50.0;
/// trace[30] += 100.0;
/// trace[31] += 50.0;
///
/// let peaks = PeakDetector::default().detect(&trace);
/// assert_eq!(peaks.len(), 1);
/// assert_eq!(peaks[0].index, 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakDetector {
    pub prominence_threshold: f64,
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self {
            prominence_threshold: 15.0,
        }
    }
}

impl PeakDetector {
    pub fn new(prominence_threshold: f64) -> Self {
        Self {
            prominence_threshold,
        }
    }

    /// Peaks in index order. An empty result is a normal outcome.
    pub fn detect(&self, trace: &[f64]) -> Vec<DetectedPeak> {
        let maxima = find_local_maxima(trace);
        if maxima.is_empty() {
            return Vec::new();
        }
        let prominences = peak_prominences(trace, &maxima);
        let widths = peak_widths(trace, &maxima, &prominences, 0.5);

        let candidates: Vec<DetectedPeak> = maxima
            .iter()
            .zip(prominences.iter())
            .zip(widths.iter())
            .filter(|(_, w)| **w >= MIN_PEAK_WIDTH)
            .map(|((&index, prom), _)| DetectedPeak {
                index,
                left_base: prom.left_base,
                right_base: prom.right_base,
                prominence: prom.prominence,
            })
            .collect();

        let candidate_proms: Vec<f64> = candidates.iter().map(|c| c.prominence).collect();
        let Some(median_prominence) = median(&candidate_proms) else {
            return Vec::new();
        };
        let cutoff = self.prominence_threshold * median_prominence;
        trace!(
            "{} maxima, {} wide enough, prominence cutoff {}",
            maxima.len(),
            candidates.len(),
            cutoff
        );

        candidates
            .into_iter()
            .filter(|c| c.prominence > cutoff)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ripple(n: usize) -> Vec<f64> {
        // Triangular ripple, every bump has prominence 1 and width 2.
        (0..n).map(|i| [0.0, 0.5, 1.0, 0.5][i % 4]).collect()
    }

    #[test]
    fn test_single_bump_over_ripple() {
        let mut trace = ripple(400);
        let apex = 202;
        for (offset, add) in [(-2, 25.0), (-1, 60.0), (0, 100.0), (1, 60.0), (2, 25.0)] {
            trace[(apex as i64 + offset) as usize] += add;
        }
        let peaks = PeakDetector::new(15.0).detect(&trace);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].index, apex);
        assert!(peaks[0].prominence > 99.0);
        assert!(peaks[0].left_base < apex && peaks[0].right_base > apex);
    }

    #[test]
    fn test_empty_and_flat_traces() {
        let detector = PeakDetector::default();
        assert!(detector.detect(&[]).is_empty());
        assert!(detector.detect(&[1.0; 100]).is_empty());
        assert!(detector.detect(&ripple(100)).is_empty());
    }

    #[test]
    fn test_lone_candidate_never_clears_its_own_median() {
        let mut trace = vec![0.0; 50];
        trace[24] = 50.0;
        trace[25] = 100.0;
        trace[26] = 50.0;
        assert!(PeakDetector::default().detect(&trace).is_empty());
        assert_eq!(PeakDetector::new(0.5).detect(&trace).len(), 1);
    }

    #[test]
    fn test_narrow_spikes_are_not_candidates() {
        let mut trace = ripple(200);
        // One-sample spike, width at half prominence is 1
        trace[102] += 1000.0;
        assert!(PeakDetector::default().detect(&trace).is_empty());
    }
}
