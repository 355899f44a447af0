//! Precomputed isotope ratios carried alongside the feature matrix.
//!
//! The table is produced by an external formula tool. It is validated on
//! load and written back out next to the matrix, nothing here computes or
//! uses the ratios.

use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};
use tracing::info;

use crate::errors::{
    HrmsFeatError,
    Result,
};

pub const ISOTOPE_RATIOS_FILENAME: &str = "isotope_ratios.json";

/// One entry, keyed by feature id or by mass.
///
/// Fields other than the key and the ratios are kept as they were read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsotopeRatioEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    pub ratios: Vec<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IsotopeRatioTable {
    pub entries: Vec<IsotopeRatioEntry>,
}

impl IsotopeRatioTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| HrmsFeatError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        let table: Self = serde_json::from_str(&content).map_err(|source| HrmsFeatError::Json {
            source,
            path: path.to_path_buf(),
        })?;
        info!("Loaded {} isotope ratio entries from {}", table.len(), path.display());
        Ok(table)
    }

    /// Write the table as `isotope_ratios.json` inside `directory`.
    pub fn write_to_dir(&self, directory: impl AsRef<Path>) -> Result<std::path::PathBuf> {
        let path = directory.as_ref().join(ISOTOPE_RATIOS_FILENAME);
        let file = std::fs::File::create(&path).map_err(|source| HrmsFeatError::Io {
            source,
            path: path.clone(),
        })?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self).map_err(|source| {
            HrmsFeatError::Json {
                source,
                path: path.clone(),
            }
        })?;
        Ok(path)
    }
}
