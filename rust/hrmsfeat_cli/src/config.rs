use hrmsfeat::{
    AlignmentConfig,
    PickingConfig,
    QualificationConfig,
    ValueSelector,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};
use tracing::info;

use crate::error::CliError;

/// Everything a pipeline run can be tuned with.
///
/// Any section or field missing from the file keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub picking: PickingConfig,
    pub qualification: QualificationConfig,
    pub alignment: AlignmentConfig,
    pub matrix: MatrixConfig,
    /// Files processed at the same time, all cores when unset.
    pub workers: Option<usize>,
    pub isotope_ratios: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    pub value: ValueSelector,
}

impl PipelineConfig {
    /// Read the config file, or fall back to the defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            info!("No configuration file given, using defaults");
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CliError> {
        let positive = [
            ("picking.axis_ppm", self.picking.axis_ppm),
            ("picking.extraction_ppm", self.picking.extraction_ppm),
            ("alignment.rt_error", self.alignment.rt_error),
            ("alignment.mz_error", self.alignment.mz_error),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CliError::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if self.workers == Some(0) {
            return Err(CliError::Config("workers must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn with_overrides(
        mut self,
        workers: Option<usize>,
        value: Option<ValueSelector>,
        isotope_ratios: Option<PathBuf>,
    ) -> Result<Self, CliError> {
        if let Some(workers) = workers {
            self.workers = Some(workers);
        }
        if let Some(value) = value {
            self.matrix.value = value;
        }
        if let Some(path) = isotope_ratios {
            self.isotope_ratios = Some(path);
        }
        self.validate()?;
        Ok(self)
    }
}

pub const CONFIG_TEMPLATE: &str = r#"{
    "picking": {
        "axis_ppm": 50.0,
        "extraction_ppm": 50.0,
        "prominence_threshold": 15.0
    },
    "qualification": {
        "intensity_threshold": 500.0,
        "sn_threshold": 5.0
    },
    "alignment": {
        "rt_error": 0.1,
        "mz_error": 0.005
    },
    "matrix": {
        "value": "area"
    },
    "workers": null,
    "isotope_ratios": null
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_matches_defaults() {
        let config: PipelineConfig = serde_json::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"alignment": {"rt_error": 0.2}, "matrix": {"value": "intensity"}}"#)
                .unwrap();
        assert_eq!(config.alignment.rt_error, 0.2);
        assert_eq!(config.alignment.mz_error, 0.005);
        assert_eq!(config.matrix.value, ValueSelector::Intensity);
        assert_eq!(config.picking, PickingConfig::default());
    }

    #[test]
    fn test_overrides_and_validation() {
        let config = PipelineConfig::default()
            .with_overrides(Some(2), Some(ValueSelector::Intensity), None)
            .unwrap();
        assert_eq!(config.workers, Some(2));
        assert_eq!(config.matrix.value, ValueSelector::Intensity);

        assert!(matches!(
            PipelineConfig::default().with_overrides(Some(0), None, None),
            Err(CliError::Config(_))
        ));

        let mut bad = PipelineConfig::default();
        bad.alignment.mz_error = -1.0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_load_without_path_is_default() {
        assert_eq!(PipelineConfig::load(None).unwrap(), PipelineConfig::default());
    }
}
