/// Median of a slice, the mean of the two central values for even lengths.
///
/// NaN values are ordered with `total_cmp`, callers are expected to pass
/// finite data.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with `n` in the denominator.
pub fn population_std(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let var = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Round to a number of decimal places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

fn simpson_odd(y: &[f64]) -> f64 {
    // Composite rule over an odd number of unit-spaced samples.
    let mut acc = 0.0;
    let mut i = 0;
    while i + 2 < y.len() {
        acc += y[i] + 4.0 * y[i + 1] + y[i + 2];
        i += 2;
    }
    acc / 3.0
}

/// Composite Simpson integral of unit-spaced samples.
///
/// With an even number of samples the last interval cannot be covered by
/// a parabola, so the result is the average of two estimates: Simpson on
/// the first `n - 1` samples plus a trapezoid on the last interval, and a
/// trapezoid on the first interval plus Simpson on the last `n - 1`.
///
/// ```
/// use hrmsfeat::utils::simpson;
///
/// assert_eq!(simpson(&[1.0, 1.0, 1.0]), 2.0);
/// assert_eq!(simpson(&[0.0, 1.0, 4.0, 9.0, 16.0]), 64.0 / 3.0);
/// ```
pub fn simpson(y: &[f64]) -> f64 {
    let n = y.len();
    match n {
        0 | 1 => 0.0,
        _ if n % 2 == 1 => simpson_odd(y),
        _ => {
            let first = simpson_odd(&y[..n - 1]) + 0.5 * (y[n - 2] + y[n - 1]);
            let last = 0.5 * (y[0] + y[1]) + simpson_odd(&y[1..]);
            (first + last) / 2.0
        }
    }
}
