use hrmsfeat::{
    FeatureAligner,
    FeatureMatrixBuilder,
    PickingConfig,
    QualificationConfig,
    QualifiedPeak,
    ValueSelector,
    process_matrix,
};
use hrmsquery::{
    Array2D,
    IntensityMatrix,
};
use rand::{
    Rng,
    SeedableRng,
};
use rand_chacha::ChaCha8Rng;

const PEAK_MASS: f64 = 200.001;
const PEAK_RT: f64 = 10.0;
const PEAK_HEIGHT: f32 = 5000.0;
const NOISE_AMPLITUDE: f32 = 50.0;

/// Uniform noise over the whole grid plus one gaussian peak.
///
/// Masses are `first_mass_milli + i` thousandths, retention times are
/// `0.00..=20.00` in steps of 0.01.
fn synthetic_matrix(first_mass_milli: i64, last_mass_milli: i64, seed: u64) -> IntensityMatrix {
    let mass: Vec<f64> = (first_mass_milli..=last_mass_milli)
        .map(|m| m as f64 / 1000.0)
        .collect();
    let rt: Vec<f64> = (0..=2000).map(|j| j as f64 / 100.0).collect();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut values: Vec<f32> = (0..mass.len() * rt.len())
        .map(|_| rng.gen_range(0.0..NOISE_AMPLITUDE))
        .collect();

    let peak_row = mass
        .iter()
        .position(|m| (m - PEAK_MASS).abs() < 1e-9)
        .unwrap();
    let peak_col = rt.iter().position(|r| (r - PEAK_RT).abs() < 1e-9).unwrap();
    let sigma_mass = 0.0005;
    let sigma_rt_samples = 1.0;
    for di in -3i64..=3 {
        for dj in -5i64..=5 {
            let row = (peak_row as i64 + di) as usize;
            let col = (peak_col as i64 + dj) as usize;
            let dm = di as f64 * 0.001 / sigma_mass;
            let dt = dj as f64 / sigma_rt_samples;
            let add = PEAK_HEIGHT as f64 * (-0.5 * (dm * dm + dt * dt)).exp();
            values[row * rt.len() + col] += add as f32;
        }
    }

    let n_mass = mass.len();
    let n_rt = rt.len();
    let intensities = Array2D::from_flat_vector(values, n_mass, n_rt).unwrap();
    IntensityMatrix::try_new(mass, rt, intensities).unwrap()
}

fn is_injected_peak(p: &QualifiedPeak) -> bool {
    p.retention_time == PEAK_RT && p.mass == PEAK_MASS
}

fn check_qualified(qualified: &[QualifiedPeak]) {
    assert!(
        qualified.iter().any(is_injected_peak),
        "injected peak not found in {:?}",
        qualified
    );
    let defaults = QualificationConfig::default();
    for p in qualified {
        assert!(p.intensity > defaults.intensity_threshold);
        assert!(p.sn_left > defaults.sn_threshold || p.sn_right > defaults.sn_threshold);
    }
    assert!(
        qualified
            .windows(2)
            .all(|w| w[0].intensity <= w[1].intensity)
    );
}

#[test]
fn test_injected_peak_is_found_and_aligned() {
    let picking = PickingConfig::default();
    let qualification = QualificationConfig::default();

    let files: Vec<Vec<QualifiedPeak>> = [42u64, 43]
        .iter()
        .map(|seed| {
            let matrix = synthetic_matrix(199_500, 200_500, *seed);
            let peaks = process_matrix(&matrix, &picking, &qualification);
            assert!(peaks.num_raw_peaks >= peaks.qualified.len());
            peaks.qualified
        })
        .collect();
    for qualified in files.iter() {
        check_qualified(qualified);
    }

    let alignment = FeatureAligner::default().align(&files).unwrap();
    for records in alignment.files.iter() {
        let injected = records
            .iter()
            .find(|r| r.retention_time == PEAK_RT && r.mass == PEAK_MASS)
            .unwrap();
        assert_eq!(injected.feature_id, "10.00_200.0010");
    }

    let mut builder = FeatureMatrixBuilder::new(ValueSelector::Area);
    builder.add_sample("sample_a", &alignment.files[0]);
    builder.add_sample("sample_b", &alignment.files[1]);
    let matrix = builder.build();
    let row = matrix.row("10.00_200.0010").unwrap();
    assert!(row.iter().all(|v| v.is_some_and(|area| area > 0.0)));
}

#[test]
#[ignore = "full 190-210 mass axis, about 160 MB of intensities"]
fn test_injected_peak_full_mass_axis() {
    let matrix = synthetic_matrix(190_000, 210_000, 42);
    let peaks = process_matrix(
        &matrix,
        &PickingConfig::default(),
        &QualificationConfig::default(),
    );
    check_qualified(&peaks.qualified);

    let alignment = FeatureAligner::default().align(&[peaks.qualified]).unwrap();
    assert!(
        alignment.files[0]
            .iter()
            .any(|r| r.feature_id == "10.00_200.0010")
    );
}
