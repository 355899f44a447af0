use std::sync::Arc;

/// Extracted ion chromatogram (EIC).
///
/// One intensity per point of the retention time axis. The axis is shared
/// with the matrix the trace was extracted from.
#[derive(Debug, Clone, PartialEq)]
pub struct Chromatogram {
    retention_time: Arc<[f64]>,
    intensity: Vec<f64>,
}

impl Chromatogram {
    /// Returns `None` when the trace and the axis lengths differ.
    pub fn try_new(retention_time: Arc<[f64]>, intensity: Vec<f64>) -> Option<Self> {
        if retention_time.len() != intensity.len() {
            return None;
        }
        Some(Self {
            retention_time,
            intensity,
        })
    }

    pub fn zeros(retention_time: Arc<[f64]>) -> Self {
        let intensity = vec![0.0; retention_time.len()];
        Self {
            retention_time,
            intensity,
        }
    }

    pub fn retention_time(&self) -> &[f64] {
        &self.retention_time
    }

    pub fn intensity(&self) -> &[f64] {
        &self.intensity
    }

    pub fn len(&self) -> usize {
        self.intensity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intensity.is_empty()
    }
}
