use hrmsfeat::isotopes::IsotopeRatioTable;
use hrmsfeat::tables::{
    write_aligned_table,
    write_feature_matrix,
    write_peak_table,
};
use hrmsfeat::{
    FeatureAligner,
    FeatureMatrixBuilder,
    QualifiedPeak,
    process_matrix,
};
use hrmsquery::serde::read_intensity_matrix;
use indicatif::{
    ParallelProgressIterator,
    ProgressStyle,
};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};
use std::time::Instant;
use tracing::{
    error,
    info,
    instrument,
};

use crate::config::PipelineConfig;
use crate::error::CliError;

pub const PEAK_TABLE_SUFFIX: &str = ".peaks.csv";
pub const ALIGNED_TABLE_SUFFIX: &str = ".aligned.csv";
pub const FEATURE_MATRIX_FILENAME: &str = "feature_matrix.csv";

/// Qualified peaks of one input file.
#[derive(Debug, Clone)]
pub struct SamplePeaks {
    pub sample: String,
    pub peaks: Vec<QualifiedPeak>,
}

/// Sample name of an input or peak table path.
///
/// `run_01.json` and `run_01.peaks.csv` are both `run_01`.
pub fn sample_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some(stripped) = name.strip_suffix(PEAK_TABLE_SUFFIX) {
        return stripped.to_string();
    }
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or(name)
}

/// Fail when two paths map to the same sample name.
///
/// Their tables would be written to the same output files.
pub fn check_unique_samples(paths: &[PathBuf]) -> Result<(), CliError> {
    let mut seen: HashMap<String, &PathBuf> = HashMap::with_capacity(paths.len());
    for path in paths {
        let sample = sample_name(path);
        if let Some(first) = seen.get(&sample) {
            return Err(CliError::DuplicateSample {
                sample,
                first: (*first).clone(),
                second: path.clone(),
            });
        }
        seen.insert(sample, path);
    }
    Ok(())
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .expect("progress template is valid")
}

fn pick_one(
    path: &Path,
    config: &PipelineConfig,
    output_dir: &Path,
) -> Result<SamplePeaks, CliError> {
    let sample = sample_name(path);
    let matrix = read_intensity_matrix(path)?;
    let result = process_matrix(&matrix, &config.picking, &config.qualification);
    let table_path = output_dir.join(format!("{}{}", sample, PEAK_TABLE_SUFFIX));
    write_peak_table(&table_path, &result.qualified)?;
    info!(
        "{}: {} raw peaks, {} qualified, written to {}",
        sample,
        result.num_raw_peaks,
        result.qualified.len(),
        table_path.display()
    );
    Ok(SamplePeaks {
        sample,
        peaks: result.qualified,
    })
}

/// Pick and qualify every input file, writing one peak table per file.
///
/// A file that cannot be read or written is logged and skipped. The
/// returned samples keep the input order.
#[instrument(skip_all, fields(num_files = inputs.len()))]
pub fn pick_files(
    inputs: &[PathBuf],
    config: &PipelineConfig,
    output_dir: &Path,
) -> Result<Vec<SamplePeaks>, CliError> {
    check_unique_samples(inputs)?;
    std::fs::create_dir_all(output_dir)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers.unwrap_or(0))
        .build()?;

    let start = Instant::now();
    let results: Vec<Option<SamplePeaks>> = pool.install(|| {
        inputs
            .par_iter()
            .progress_with_style(progress_style())
            .map(|path| match pick_one(path, config, output_dir) {
                Ok(sample) => Some(sample),
                Err(e) => {
                    error!("Skipping {}: {}", path.display(), e);
                    None
                }
            })
            .collect()
    });
    let samples: Vec<SamplePeaks> = results.into_iter().flatten().collect();
    info!(
        "Picked {} of {} files in {:?}",
        samples.len(),
        inputs.len(),
        start.elapsed()
    );

    if samples.is_empty() && !inputs.is_empty() {
        return Err(CliError::NoFilesProcessed(inputs.len()));
    }
    Ok(samples)
}

/// Align the samples, then write the aligned tables and the feature matrix.
///
/// Returns the path of the feature matrix.
#[instrument(skip_all, fields(num_samples = samples.len()))]
pub fn align_samples(
    samples: &[SamplePeaks],
    config: &PipelineConfig,
    output_dir: &Path,
) -> Result<PathBuf, CliError> {
    std::fs::create_dir_all(output_dir)?;
    let aligner = FeatureAligner::new(config.alignment);
    let peaks: Vec<&[QualifiedPeak]> = samples.iter().map(|s| s.peaks.as_slice()).collect();
    let alignment = aligner.align(&peaks).map_err(hrmsfeat::HrmsFeatError::from)?;

    let mut builder = FeatureMatrixBuilder::new(config.matrix.value);
    for (sample, records) in samples.iter().zip(alignment.files.iter()) {
        let path = output_dir.join(format!("{}{}", sample.sample, ALIGNED_TABLE_SUFFIX));
        write_aligned_table(&path, records)?;
        builder.add_sample(sample.sample.clone(), records);
    }

    let matrix = builder.build();
    let matrix_path = output_dir.join(FEATURE_MATRIX_FILENAME);
    write_feature_matrix(&matrix_path, &matrix)?;
    info!(
        "Wrote {} features x {} samples to {}",
        matrix.n_features(),
        matrix.samples().len(),
        matrix_path.display()
    );

    if let Some(isotope_path) = &config.isotope_ratios {
        let table = IsotopeRatioTable::read(isotope_path)?;
        let written = table.write_to_dir(output_dir)?;
        info!("Copied isotope ratios to {}", written.display());
    }
    Ok(matrix_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrmsfeat::tables::{
        read_aligned_table,
        read_peak_table,
    };
    use hrmsquery::IntensityMatrix;
    use hrmsquery::serde::write_intensity_matrix_json;

    fn peak(retention_time: f64, mass: f64, intensity: f64, area: f64) -> QualifiedPeak {
        QualifiedPeak {
            retention_time,
            mass,
            intensity,
            sn_left: 10.0,
            sn_right: 10.0,
            area,
        }
    }

    #[test]
    fn test_sample_name() {
        assert_eq!(sample_name(Path::new("data/run_01.json")), "run_01");
        assert_eq!(sample_name(Path::new("out/run_01.peaks.csv")), "run_01");
        assert_eq!(sample_name(Path::new("run.02.csv")), "run.02");
    }

    #[test]
    fn test_same_stem_inputs_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![
            dir.path().join("a/x.json"),
            dir.path().join("b/x.json"),
        ];
        let out = dir.path().join("out");
        let result = pick_files(&inputs, &PipelineConfig::default(), &out);
        match result {
            Err(CliError::DuplicateSample { sample, first, second }) => {
                assert_eq!(sample, "x");
                assert_eq!(first, inputs[0]);
                assert_eq!(second, inputs[1]);
            }
            other => panic!("expected a duplicate sample error, got {:?}", other),
        }
        assert!(!out.exists());

        let tables = vec![
            PathBuf::from("a/x.peaks.csv"),
            PathBuf::from("b/x.json"),
            PathBuf::from("y.json"),
        ];
        assert!(check_unique_samples(&tables).is_err());
        assert!(check_unique_samples(&tables[1..]).is_ok());
    }

    #[test]
    fn test_align_samples_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let samples = vec![
            SamplePeaks {
                sample: "a".to_string(),
                peaks: vec![peak(10.0, 200.001, 5000.0, 100.0)],
            },
            SamplePeaks {
                sample: "b".to_string(),
                peaks: vec![
                    peak(10.05, 200.003, 4000.0, 80.0),
                    peak(20.0, 300.0, 900.0, 10.0),
                ],
            },
        ];
        let config = PipelineConfig::default();

        let matrix_path = align_samples(&samples, &config, dir.path()).unwrap();
        let content = std::fs::read_to_string(&matrix_path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("feature_id,a,b"));
        assert_eq!(lines.clone().count(), 2);

        let aligned_b = read_aligned_table(dir.path().join("b.aligned.csv")).unwrap();
        assert_eq!(aligned_b.len(), 2);
        let aligned_a = read_aligned_table(dir.path().join("a.aligned.csv")).unwrap();
        assert_eq!(aligned_a[0].feature_id, aligned_b[0].feature_id);
        assert!(!dir.path().join("isotope_ratios.json").exists());
    }

    #[test]
    fn test_pick_files_skips_unreadable_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("flat.json");
        let matrix = IntensityMatrix::from_rows(
            vec![100.0, 100.001, 100.002],
            (0..20).map(|i| i as f64 * 0.1).collect(),
            vec![vec![10.0f32; 20]; 3],
        )
        .unwrap();
        write_intensity_matrix_json(&matrix, &good).unwrap();
        let missing = dir.path().join("missing.json");

        let out = dir.path().join("out");
        let config = PipelineConfig::default()
            .with_overrides(Some(1), None, None)
            .unwrap();
        let samples = pick_files(&[missing.clone(), good], &config, &out).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].sample, "flat");
        assert!(samples[0].peaks.is_empty());
        assert!(read_peak_table(out.join("flat.peaks.csv")).unwrap().is_empty());

        assert!(matches!(
            pick_files(&[missing], &config, &out),
            Err(CliError::NoFilesProcessed(1))
        ));
    }
}
