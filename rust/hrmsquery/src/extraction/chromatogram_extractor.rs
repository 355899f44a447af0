use std::ops::Range;

use crate::models::{
    Chromatogram,
    IntensityMatrix,
};
use crate::utils::ppm_tol_range;

/// Mass rows summed when extracting `mass` at `ppm` tolerance.
///
/// Each window bound is snapped to the *nearest* mass row, and the span is
/// half-open (`[low_row, high_row)`). This is not a strict inclusive mass
/// filter: depending on where the bounds fall relative to the axis points,
/// a row just outside the window can be included, or the row nearest the
/// upper bound left out.
pub fn extraction_row_span(matrix: &IntensityMatrix, mass: f64, ppm: f64) -> Range<usize> {
    let window = ppm_tol_range(mass, ppm);
    let low_index = matrix.nearest_mass_index(window.start());
    let high_index = matrix.nearest_mass_index(window.end());
    low_index..high_index
}

/// Sum the intensities of the mass window around `mass` for every retention time.
///
/// If no rows fall in the located span an all-zero trace of the
/// right length is returned.
///
/// ```
/// use hrmsquery::IntensityMatrix;
/// use hrmsquery::extraction::extract_chromatogram;
///
/// let matrix = IntensityMatrix::from_rows(
///     vec![199.98, 199.995, 200.0, 200.005, 200.02],
///     vec![0.0, 0.01, 0.02],
///     vec![
///         vec![100.0, 100.0, 100.0],
///         vec![1.0, 2.0, 3.0],
///         vec![10.0, 20.0, 30.0],
///         vec![5.0, 5.0, 5.0],
///         vec![100.0, 100.0, 100.0],
///     ],
/// )
/// .unwrap();
/// let eic = extract_chromatogram(&matrix, 200.0, 50.0);
/// // Window is [199.99, 200.01] -> rows 1..3 (the 200.005 row is the nearest
/// // to the upper bound, so it is excluded).
/// assert_eq!(eic.intensity(), &[11.0, 22.0, 33.0]);
/// ```
pub fn extract_chromatogram(matrix: &IntensityMatrix, mass: f64, ppm: f64) -> Chromatogram {
    let span = extraction_row_span(matrix, mass, ppm);
    if span.is_empty() {
        return Chromatogram::zeros(matrix.shared_rt_axis());
    }
    let trace = matrix.sum_mass_rows(span);
    Chromatogram::try_new(matrix.shared_rt_axis(), trace)
        .expect("summed trace always has one value per retention time")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ladder_matrix() -> IntensityMatrix {
        let mass: Vec<f64> = (0..21).map(|i| 199.99 + (i as f64) * 0.001).collect();
        let rows: Vec<Vec<f32>> = (0..21).map(|i| vec![i as f32, 1.0]).collect();
        IntensityMatrix::from_rows(mass, vec![0.0, 1.0], rows).unwrap()
    }

    #[test]
    fn test_trace_has_axis_length() {
        let m = ladder_matrix();
        let eic = extract_chromatogram(&m, 200.0, 50.0);
        assert_eq!(eic.len(), m.n_rt());
        assert_eq!(eic.retention_time(), m.rt_axis());
    }

    #[test]
    fn test_half_open_nearest_span() {
        let m = ladder_matrix();
        // 200.0 +/- 10 mDa snaps to rows 0 and 20, row 20 is excluded.
        let span = extraction_row_span(&m, 200.0, 50.0);
        assert_eq!(span, 0..20);
        let eic = extract_chromatogram(&m, 200.0, 50.0);
        assert_eq!(eic.intensity()[1], 20.0);
        assert_eq!(eic.intensity()[0], (0..20).sum::<i32>() as f64);
    }

    #[test]
    fn test_out_of_range_mass_is_all_zero() {
        let m = ladder_matrix();
        // Both bounds snap onto the last row -> empty span.
        let eic = extract_chromatogram(&m, 500.0, 50.0);
        assert_eq!(eic.intensity(), &[0.0, 0.0]);
        let eic = extract_chromatogram(&m, 10.0, 50.0);
        assert_eq!(eic.intensity(), &[0.0, 0.0]);
    }
}
