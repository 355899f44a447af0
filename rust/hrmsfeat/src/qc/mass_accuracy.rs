use hrmsquery::Spectrum;

use crate::detection::find_local_maxima;
use crate::utils::round_to;

/// Spectrum points searched on each side of the observed maximum.
pub const PROFILE_HALF_WIDTH: usize = 15;

/// Observed mass, error and resolution of a spectral peak near an expected mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassAccuracy {
    pub expected_mass: f64,
    pub observed_mass: f64,
    /// `(observed - expected) / expected` in ppm, rounded to one decimal.
    pub ppm_error: f64,
    /// `observed / FWHM`, truncated. `None` when the profile does not drop
    /// to half height on both sides within [`PROFILE_HALF_WIDTH`] points.
    pub resolution: Option<f64>,
}

fn interpolate(x0: f64, y0: f64, x1: f64, y1: f64, y: f64) -> f64 {
    if y1 == y0 {
        return x0;
    }
    x0 + (y - y0) / (y1 - y0) * (x1 - x0)
}

/// Mass accuracy of the local spectral maximum closest to `expected_mass`.
///
/// Returns `None` when the spectrum has no local maximum.
pub fn evaluate_mass_accuracy(spectrum: &Spectrum<'_>, expected_mass: f64) -> Option<MassAccuracy> {
    let intensity: Vec<f64> = spectrum.intensity.iter().map(|&v| v as f64).collect();
    let mass = spectrum.mass;

    let apex = find_local_maxima(&intensity)
        .into_iter()
        .min_by(|&a, &b| {
            (mass[a] - expected_mass)
                .abs()
                .total_cmp(&(mass[b] - expected_mass).abs())
        })?;
    let observed_mass = mass[apex];
    let ppm_error = round_to((observed_mass - expected_mass) / expected_mass * 1e6, 1);

    let half = intensity[apex] / 2.0;
    let lo = apex.saturating_sub(PROFILE_HALF_WIDTH);
    let hi = (apex + PROFILE_HALF_WIDTH).min(intensity.len() - 1);

    let left = (lo..apex)
        .rev()
        .find(|&i| intensity[i] <= half)
        .map(|i| interpolate(mass[i], intensity[i], mass[i + 1], intensity[i + 1], half));
    let right = (apex + 1..=hi)
        .find(|&i| intensity[i] <= half)
        .map(|i| interpolate(mass[i - 1], intensity[i - 1], mass[i], intensity[i], half));

    let resolution = match (left, right) {
        (Some(l), Some(r)) if r > l => Some((observed_mass / (r - l)).trunc()),
        _ => None,
    };

    Some(MassAccuracy {
        expected_mass,
        observed_mass,
        ppm_error,
        resolution,
    })
}
