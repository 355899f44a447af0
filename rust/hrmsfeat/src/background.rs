use crate::utils::{
    mean,
    median,
    population_std,
};

/// Background reported for windows too short to estimate from.
///
/// Large enough that any realistic peak height divided by it fails a
/// signal-to-noise gate.
pub const SHORT_WINDOW_BACKGROUND: f64 = 1_000_000.0;

/// Windows with at most this many samples get [`SHORT_WINDOW_BACKGROUND`].
pub const MIN_BACKGROUND_SAMPLES: usize = 5;

/// Robust background level of a flanking segment of a trace.
///
/// The estimate depends on how the segment is distributed:
///
/// - median of zero (mostly empty segment): mean plus one standard deviation.
/// - mean at most five times the median (flat noise): the maximum.
/// - mean above five times the median (spiky segment): the median.
///
/// One is always added so the result can be used as a divisor.
///
/// ```
/// use hrmsfeat::background::estimate_background;
///
/// assert_eq!(estimate_background(&[50.0; 10]), 51.0);
/// assert_eq!(estimate_background(&[0.0; 10]), 1.0);
/// assert_eq!(estimate_background(&[1.0, 2.0]), 1_000_001.0);
/// ```
pub fn estimate_background(window: &[f64]) -> f64 {
    if window.len() <= MIN_BACKGROUND_SAMPLES {
        return SHORT_WINDOW_BACKGROUND + 1.0;
    }
    // Non-empty past the length check.
    let med = median(window).unwrap_or(0.0);
    let avg = mean(window).unwrap_or(0.0);

    let background = if med == 0.0 {
        avg + population_std(window).unwrap_or(0.0)
    } else if avg <= med * 5.0 {
        window.iter().copied().fold(f64::MIN, f64::max)
    } else {
        med
    };
    background + 1.0
}
