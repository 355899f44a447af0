use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};
use tracing::debug;

use crate::alignment::AlignedPeakRecord;

/// Which value of an aligned peak fills the feature matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSelector {
    #[default]
    Area,
    Intensity,
}

impl ValueSelector {
    pub fn select(&self, record: &AlignedPeakRecord) -> f64 {
        match self {
            ValueSelector::Area => record.area,
            ValueSelector::Intensity => record.intensity,
        }
    }
}

/// Feature x sample table, `None` where a feature is absent from a sample.
///
/// Features are kept in order of first appearance across samples.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    samples: Vec<String>,
    rows: IndexMap<String, Vec<Option<f64>>>,
}

impl FeatureMatrix {
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn n_features(&self) -> usize {
        self.rows.len()
    }

    pub fn feature_ids(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(|k| k.as_str())
    }

    pub fn row(&self, feature_id: &str) -> Option<&[Option<f64>]> {
        self.rows.get(feature_id).map(|r| r.as_slice())
    }

    pub fn get(&self, feature_id: &str, sample: &str) -> Option<f64> {
        let col = self.samples.iter().position(|s| s == sample)?;
        self.rows.get(feature_id)?[col]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Outer join of per-sample aligned tables on feature id.
///
/// ```
/// use hrmsfeat::alignment::AlignedPeakRecord;
/// use hrmsfeat::matrix::{
///     FeatureMatrixBuilder,
///     ValueSelector,
/// };
///
/// let record = |id: &str, area: f64| AlignedPeakRecord {
///     retention_time: 10.0,
///     mass: 200.0,
///     intensity: 1.0,
///     sn_left: 10.0,
///     sn_right: 10.0,
///     area,
///     feature_id: id.to_string(),
/// };
///
/// let mut builder = FeatureMatrixBuilder::new(ValueSelector::Area);
/// builder.add_sample("a", &[record("10.00_200.0000", 1000.0), record("5.00_150.0000", 7.0)]);
/// builder.add_sample("b", &[record("10.00_200.0000", 2000.0)]);
/// let matrix = builder.build();
///
/// assert_eq!(matrix.n_features(), 2);
/// assert_eq!(matrix.row("10.00_200.0000"), Some([Some(1000.0), Some(2000.0)].as_slice()));
/// assert_eq!(matrix.get("5.00_150.0000", "b"), None);
/// ```
#[derive(Debug, Clone)]
pub struct FeatureMatrixBuilder {
    selector: ValueSelector,
    samples: Vec<String>,
    rows: IndexMap<String, Vec<Option<f64>>>,
}

impl FeatureMatrixBuilder {
    pub fn new(selector: ValueSelector) -> Self {
        Self {
            selector,
            samples: Vec::new(),
            rows: IndexMap::new(),
        }
    }

    /// Add one sample column.
    ///
    /// When a feature id repeats within the sample the last record wins,
    /// and the feature is placed where its last record appears.
    pub fn add_sample(&mut self, name: impl Into<String>, records: &[AlignedPeakRecord]) {
        let mut column: IndexMap<&str, f64> = IndexMap::with_capacity(records.len());
        for record in records {
            column.shift_remove(record.feature_id.as_str());
            column.insert(record.feature_id.as_str(), self.selector.select(record));
        }
        let num_duplicates = records.len() - column.len();

        let col = self.samples.len();
        self.samples.push(name.into());
        for row in self.rows.values_mut() {
            row.push(None);
        }
        for (id, value) in column {
            let row = self
                .rows
                .entry(id.to_string())
                .or_insert_with(|| vec![None; col + 1]);
            row[col] = Some(value);
        }
        debug!(
            "Added sample {} ({} records, {} duplicate ids dropped)",
            self.samples[col],
            records.len(),
            num_duplicates
        );
    }

    pub fn build(self) -> FeatureMatrix {
        FeatureMatrix {
            samples: self.samples,
            rows: self.rows,
        }
    }
}
