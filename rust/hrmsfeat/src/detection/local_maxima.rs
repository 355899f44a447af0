/// Indices of the local maxima of `x`.
///
/// A maximum is a sample (or a flat run of equal samples) whose left and
/// right neighbours are both strictly lower. For flat runs the middle
/// index is reported, rounding down. The first and last samples are never
/// maxima.
///
/// ```
/// use hrmsfeat::detection::find_local_maxima;
///
/// assert_eq!(find_local_maxima(&[0.0, 2.0, 1.0, 3.0, 3.0, 3.0, 0.0]), vec![1, 4]);
/// assert!(find_local_maxima(&[1.0, 2.0, 3.0]).is_empty());
/// ```
pub fn find_local_maxima(x: &[f64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    if x.len() < 3 {
        return maxima;
    }
    let i_max = x.len() - 1;
    let mut i = 1;
    while i < i_max {
        if x[i - 1] < x[i] {
            let mut i_ahead = i + 1;
            while i_ahead < i_max && x[i_ahead] == x[i] {
                i_ahead += 1;
            }
            if x[i_ahead] < x[i] {
                let left_edge = i;
                let right_edge = i_ahead - 1;
                maxima.push((left_edge + right_edge) / 2);
                i = i_ahead;
            }
        }
        i += 1;
    }
    maxima
}

/// Topographic prominence of a peak and the valleys bounding it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prominence {
    pub prominence: f64,
    pub left_base: usize,
    pub right_base: usize,
}

/// Prominence of every peak in `peaks`.
///
/// From the peak, each side is walked outward for as long as the samples
/// do not exceed the peak height. The lowest sample on each side (the one
/// closest to the peak on ties) is that side's base, and the prominence is
/// the peak height above the higher of the two bases.
pub fn peak_prominences(x: &[f64], peaks: &[usize]) -> Vec<Prominence> {
    peaks
        .iter()
        .map(|&peak| {
            let height = x[peak];

            let mut left_min = height;
            let mut left_base = peak;
            let mut i = peak;
            loop {
                if x[i] > height {
                    break;
                }
                if x[i] < left_min {
                    left_min = x[i];
                    left_base = i;
                }
                if i == 0 {
                    break;
                }
                i -= 1;
            }

            let mut right_min = height;
            let mut right_base = peak;
            for (j, &v) in x.iter().enumerate().skip(peak) {
                if v > height {
                    break;
                }
                if v < right_min {
                    right_min = v;
                    right_base = j;
                }
            }

            Prominence {
                prominence: height - left_min.max(right_min),
                left_base,
                right_base,
            }
        })
        .collect()
}

/// Width of each peak at `rel_height` of its prominence below the apex.
///
/// The crossing points on each side are linearly interpolated and never
/// go past the peak's bases.
pub fn peak_widths(
    x: &[f64],
    peaks: &[usize],
    prominences: &[Prominence],
    rel_height: f64,
) -> Vec<f64> {
    peaks
        .iter()
        .zip(prominences.iter())
        .map(|(&peak, prom)| {
            let height = x[peak] - prom.prominence * rel_height;

            let mut i = peak;
            while prom.left_base < i && height < x[i] {
                i -= 1;
            }
            let mut left_ip = i as f64;
            if x[i] < height {
                left_ip += (height - x[i]) / (x[i + 1] - x[i]);
            }

            let mut i = peak;
            while i < prom.right_base && height < x[i] {
                i += 1;
            }
            let mut right_ip = i as f64;
            if x[i] < height {
                right_ip -= (height - x[i]) / (x[i - 1] - x[i]);
            }

            right_ip - left_ip
        })
        .collect()
}
