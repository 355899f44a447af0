//! Cross-file alignment of qualified peaks onto shared reference features.
//!
//! The (retention time, mass) pairs of every file are pooled in file order
//! and reduced to a list of [`ReferenceFeature`]s in two passes:
//!
//! 1. **Seeding**: the first pair left in the pool is a seed. Every pair in
//!    the pool within the tolerance window around the *seed* (not around a
//!    running centroid) joins its cluster, the cluster is removed from the
//!    pool and its mean becomes a reference. Repeat until the pool is empty.
//!    Clusters therefore depend on the pooling order.
//! 2. **Backfill**: the mean of a cluster can drift away from its outer
//!    members. Every pooled pair that is not within tolerance of a seeded
//!    reference is appended to the list as a reference of its own.
//!
//! Each file's peaks are then assigned the id of the first reference within
//! tolerance. After the backfill a peak with no reference at all is a
//! bookkeeping error and aborts the alignment.

use hrmsquery::utils::abs_tol_range;
use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    info,
    instrument,
    warn,
};

use crate::errors::AlignmentError;
use crate::qualification::QualifiedPeak;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    pub rt_error: f64,
    pub mz_error: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            rt_error: 0.1,
            mz_error: 0.005,
        }
    }
}

/// Id of a feature: retention time with 2 decimals, mass with 4.
///
/// ```
/// use hrmsfeat::alignment::feature_id;
///
/// assert_eq!(feature_id(10.0, 200.001), "10.00_200.0010");
/// assert_eq!(feature_id(3.456, 150.12346), "3.46_150.1235");
/// ```
pub fn feature_id(retention_time: f64, mass: f64) -> String {
    format!("{:.2}_{:.4}", retention_time, mass)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFeature {
    pub retention_time: f64,
    pub mass: f64,
}

impl ReferenceFeature {
    pub fn id(&self) -> String {
        feature_id(self.retention_time, self.mass)
    }

    /// Whether a pair falls in the closed tolerance window around this feature.
    pub fn matches(&self, retention_time: f64, mass: f64, config: &AlignmentConfig) -> bool {
        abs_tol_range(self.retention_time, config.rt_error).contains(retention_time)
            && abs_tol_range(self.mass, config.mz_error).contains(mass)
    }
}

/// A qualified peak with the id of the reference feature it was assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedPeakRecord {
    pub retention_time: f64,
    pub mass: f64,
    pub intensity: f64,
    #[serde(rename = "SN_left")]
    pub sn_left: f64,
    #[serde(rename = "SN_right")]
    pub sn_right: f64,
    pub area: f64,
    pub feature_id: String,
}

impl AlignedPeakRecord {
    pub fn new(peak: &QualifiedPeak, feature_id: String) -> Self {
        Self {
            retention_time: peak.retention_time,
            mass: peak.mass,
            intensity: peak.intensity,
            sn_left: peak.sn_left,
            sn_right: peak.sn_right,
            area: peak.area,
            feature_id,
        }
    }
}

/// References plus the aligned records of every input file, in input order.
#[derive(Debug, Clone)]
pub struct Alignment {
    pub references: Vec<ReferenceFeature>,
    pub files: Vec<Vec<AlignedPeakRecord>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureAligner {
    config: AlignmentConfig,
}

fn mean_pair(pairs: &[(f64, f64)]) -> (f64, f64) {
    let n = pairs.len() as f64;
    let (rt, mz) = pairs
        .iter()
        .fold((0.0, 0.0), |(a, b), (rt, mz)| (a + rt, b + mz));
    (rt / n, mz / n)
}

impl FeatureAligner {
    pub fn new(config: AlignmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Seeded clusters of the pooled pairs, without the backfill.
    pub fn seed_references(&self, pairs: &[(f64, f64)]) -> Vec<ReferenceFeature> {
        let mut references = Vec::new();
        let mut pool: Vec<(f64, f64)> = pairs.to_vec();
        while let Some(&(seed_rt, seed_mz)) = pool.first() {
            let seed = ReferenceFeature {
                retention_time: seed_rt,
                mass: seed_mz,
            };
            // The seed always belongs to its own cluster, even with
            // non-finite coordinates, so the pool shrinks every round.
            let (mut cluster, rest): (Vec<(f64, f64)>, Vec<(f64, f64)>) = pool[1..]
                .iter()
                .copied()
                .partition(|(rt, mz)| seed.matches(*rt, *mz, &self.config));
            cluster.insert(0, (seed_rt, seed_mz));
            pool = rest;

            let (rt, mz) = mean_pair(&cluster);
            references.push(ReferenceFeature {
                retention_time: rt,
                mass: mz,
            });
        }
        references
    }

    /// Seeded references followed by the backfilled standalone ones.
    ///
    /// Every pair in `pairs` is within tolerance of at least one of the
    /// returned references.
    #[instrument(skip_all, fields(n_pairs = pairs.len()))]
    pub fn build_references(&self, pairs: &[(f64, f64)]) -> Vec<ReferenceFeature> {
        let mut references = self.seed_references(pairs);
        let num_seeded = references.len();

        for &(rt, mz) in pairs {
            let covered = references[..num_seeded]
                .iter()
                .any(|r| r.matches(rt, mz, &self.config));
            if !covered {
                references.push(ReferenceFeature {
                    retention_time: rt,
                    mass: mz,
                });
            }
        }
        info!(
            "Built {} reference features ({} seeded, {} backfilled) from {} peaks",
            references.len(),
            num_seeded,
            references.len() - num_seeded,
            pairs.len()
        );
        references
    }

    /// Assign every peak the id of the first reference within tolerance.
    pub fn assign(
        &self,
        references: &[ReferenceFeature],
        peaks: &[QualifiedPeak],
    ) -> Result<Vec<AlignedPeakRecord>, AlignmentError> {
        let mut num_ambiguous = 0usize;
        let records = peaks
            .iter()
            .map(|peak| {
                let mut matching = references
                    .iter()
                    .filter(|r| r.matches(peak.retention_time, peak.mass, &self.config));
                let first = matching.next().ok_or(AlignmentError::OrphanPeak {
                    retention_time: peak.retention_time,
                    mass: peak.mass,
                })?;
                let others = matching.count();
                if others > 0 {
                    num_ambiguous += 1;
                    debug!(
                        "Peak at rt {}, mass {} matches {} references, using {}",
                        peak.retention_time,
                        peak.mass,
                        others + 1,
                        first.id()
                    );
                }
                Ok(AlignedPeakRecord::new(peak, first.id()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if num_ambiguous > 0 {
            warn!(
                "{} of {} peaks matched more than one reference feature, the first one was used",
                num_ambiguous,
                peaks.len()
            );
        }
        Ok(records)
    }

    /// Align the qualified peak tables of several files.
    #[instrument(skip_all, fields(n_files = files.len()))]
    pub fn align<T: AsRef<[QualifiedPeak]>>(&self, files: &[T]) -> Result<Alignment, AlignmentError> {
        let pairs: Vec<(f64, f64)> = files
            .iter()
            .flat_map(|f| f.as_ref().iter().map(|p| (p.retention_time, p.mass)))
            .collect();
        let references = self.build_references(&pairs);
        let files = files
            .iter()
            .map(|f| self.assign(&references, f.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Alignment { references, files })
    }
}
