//! CSV peak tables and feature matrices.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::alignment::AlignedPeakRecord;
use crate::errors::{
    HrmsFeatError,
    Result,
};
use crate::matrix::FeatureMatrix;
use crate::qualification::QualifiedPeak;

fn csv_error(path: &Path) -> impl Fn(csv::Error) -> HrmsFeatError + '_ {
    move |source| HrmsFeatError::Csv {
        source,
        path: path.to_path_buf(),
    }
}

fn write_records<T: Serialize>(path: &Path, records: &[T], header: &[&str]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error(path))?;
    // Written explicitly so empty tables still carry their columns.
    writer.write_record(header).map_err(csv_error(path))?;
    for record in records {
        writer.serialize(record).map_err(csv_error(path))?;
    }
    writer.flush().map_err(|source| HrmsFeatError::Io {
        source,
        path: path.to_path_buf(),
    })
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_error(path))?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(csv_error(path))
}

pub const PEAK_TABLE_COLUMNS: [&str; 6] = [
    "retention_time",
    "mass",
    "intensity",
    "SN_left",
    "SN_right",
    "area",
];

pub const ALIGNED_TABLE_COLUMNS: [&str; 7] = [
    "retention_time",
    "mass",
    "intensity",
    "SN_left",
    "SN_right",
    "area",
    "feature_id",
];

pub fn write_peak_table(path: impl AsRef<Path>, peaks: &[QualifiedPeak]) -> Result<()> {
    write_records(path.as_ref(), peaks, &PEAK_TABLE_COLUMNS)
}

pub fn read_peak_table(path: impl AsRef<Path>) -> Result<Vec<QualifiedPeak>> {
    read_records(path.as_ref())
}

pub fn write_aligned_table(path: impl AsRef<Path>, records: &[AlignedPeakRecord]) -> Result<()> {
    write_records(path.as_ref(), records, &ALIGNED_TABLE_COLUMNS)
}

pub fn read_aligned_table(path: impl AsRef<Path>) -> Result<Vec<AlignedPeakRecord>> {
    read_records(path.as_ref())
}

/// Write a feature matrix as `feature_id,<sample>...`, absent cells left empty.
pub fn write_feature_matrix(path: impl AsRef<Path>, matrix: &FeatureMatrix) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path).map_err(csv_error(path))?;

    let mut header = Vec::with_capacity(matrix.samples().len() + 1);
    header.push("feature_id");
    header.extend(matrix.samples().iter().map(|s| s.as_str()));
    writer.write_record(&header).map_err(csv_error(path))?;

    for (id, values) in matrix.iter_rows() {
        let mut record = Vec::with_capacity(values.len() + 1);
        record.push(id.to_string());
        record.extend(
            values
                .iter()
                .map(|v| v.map(|x| x.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record).map_err(csv_error(path))?;
    }
    writer.flush().map_err(|source| HrmsFeatError::Io {
        source,
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{
        FeatureMatrixBuilder,
        ValueSelector,
    };

    fn qualified() -> Vec<QualifiedPeak> {
        vec![
            QualifiedPeak {
                retention_time: 10.0,
                mass: 200.001,
                intensity: 5012.0,
                sn_left: 10.6,
                sn_right: 11.2,
                area: 23456.0,
            },
            QualifiedPeak {
                retention_time: 2.51,
                mass: 150.1234,
                intensity: 8000.0,
                sn_left: 0.0,
                sn_right: 7.5,
                area: 100.0,
            },
        ]
    }

    #[test]
    fn test_peak_table_header_and_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.peaks.csv");
        write_peak_table(&path, &qualified()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text.lines().next().unwrap(),
            "retention_time,mass,intensity,SN_left,SN_right,area"
        );
        assert_eq!(read_peak_table(&path).unwrap(), qualified());
    }

    #[test]
    fn test_empty_tables_keep_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.aligned.csv");
        write_aligned_table(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), ALIGNED_TABLE_COLUMNS.join(","));
        assert!(read_aligned_table(&path).unwrap().is_empty());
    }

    #[test]
    fn test_aligned_table_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.aligned.csv");
        let records: Vec<AlignedPeakRecord> = qualified()
            .iter()
            .map(|p| AlignedPeakRecord::new(p, "10.00_200.0010".to_string()))
            .collect();
        write_aligned_table(&path, &records).unwrap();
        assert_eq!(read_aligned_table(&path).unwrap(), records);
    }

    #[test]
    fn test_feature_matrix_missing_cells_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.csv");
        let records: Vec<AlignedPeakRecord> = qualified()
            .iter()
            .zip(["10.00_200.0010", "2.51_150.1234"])
            .map(|(p, id)| AlignedPeakRecord::new(p, id.to_string()))
            .collect();
        let mut builder = FeatureMatrixBuilder::new(ValueSelector::Area);
        builder.add_sample("s1", &records);
        builder.add_sample("s2", &records[..1]);
        write_feature_matrix(&path, &builder.build()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![
            "feature_id,s1,s2",
            "10.00_200.0010,23456,23456",
            "2.51_150.1234,100,",
        ]);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_peak_table("/definitely/not/here.csv").unwrap_err();
        match err {
            HrmsFeatError::Csv { path, .. } => {
                assert!(path.ends_with("here.csv"))
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
