use std::ops::Range;
use std::sync::Arc;

use crate::errors::{
    Axis,
    DataShapeError,
};
use crate::models::base::Array2D;
use crate::utils::{
    TupleRange,
    nearest_index,
};

/// Dense LC-MS intensity grid.
///
/// Rows are masses (ascending, unique), columns are retention times
/// (ascending, unique). Absent signal is stored as `0.0`.
///
/// The grid is read-only once built; every constructor validates the
/// axes and the intensities, so downstream code can rely on both axes
/// being non-empty and strictly increasing.
#[derive(Debug, Clone)]
pub struct IntensityMatrix {
    mass: Arc<[f64]>,
    retention_time: Arc<[f64]>,
    intensities: Array2D<f32>,
}

fn validate_axis(values: &[f64], axis: Axis) -> Result<(), DataShapeError> {
    if values.is_empty() {
        return Err(DataShapeError::EmptyAxis { axis });
    }
    for (index, v) in values.iter().enumerate() {
        if !v.is_finite() {
            return Err(DataShapeError::NonFiniteAxisValue { axis, index });
        }
    }
    for (i, w) in values.windows(2).enumerate() {
        if w[1] <= w[0] {
            return Err(DataShapeError::NonMonotonicAxis {
                axis,
                index: i + 1,
                previous: w[0],
                current: w[1],
            });
        }
    }
    Ok(())
}

impl IntensityMatrix {
    pub fn try_new(
        mass: impl Into<Arc<[f64]>>,
        retention_time: impl Into<Arc<[f64]>>,
        intensities: Array2D<f32>,
    ) -> Result<Self, DataShapeError> {
        let mass = mass.into();
        let retention_time = retention_time.into();
        validate_axis(&mass, Axis::Mass)?;
        validate_axis(&retention_time, Axis::RetentionTime)?;

        if intensities.nrows() != mass.len() {
            return Err(DataShapeError::ExpectedVectorLength {
                real: intensities.nrows(),
                expected: mass.len(),
            });
        }
        if intensities.ncols() != retention_time.len() {
            return Err(DataShapeError::ExpectedVectorLength {
                real: intensities.ncols(),
                expected: retention_time.len(),
            });
        }

        let ncols = intensities.ncols();
        if let Some((flat_idx, value)) = intensities
            .as_flat_slice()
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(DataShapeError::InvalidIntensity {
                mass_index: flat_idx / ncols,
                rt_index: flat_idx % ncols,
                value: *value,
            });
        }

        Ok(Self {
            mass,
            retention_time,
            intensities,
        })
    }

    /// Build from one intensity vector per mass.
    ///
    /// ```
    /// use hrmsquery::IntensityMatrix;
    ///
    /// let matrix = IntensityMatrix::from_rows(
    ///     vec![100.0, 100.001],
    ///     vec![0.0, 0.01, 0.02],
    ///     vec![vec![0.0, 5.0, 0.0], vec![1.0, 2.0, 3.0]],
    /// )
    /// .unwrap();
    /// assert_eq!(matrix.n_mass(), 2);
    /// assert_eq!(matrix.n_rt(), 3);
    /// assert_eq!(matrix.intensity(1, 2), 3.0);
    ///
    /// // Unsorted axes are rejected
    /// assert!(IntensityMatrix::from_rows(
    ///     vec![100.001, 100.0],
    ///     vec![0.0],
    ///     vec![vec![1.0], vec![1.0]],
    /// )
    /// .is_err());
    /// ```
    pub fn from_rows(
        mass: Vec<f64>,
        retention_time: Vec<f64>,
        rows: Vec<Vec<f32>>,
    ) -> Result<Self, DataShapeError> {
        if rows.len() != mass.len() {
            return Err(DataShapeError::ExpectedVectorLength {
                real: rows.len(),
                expected: mass.len(),
            });
        }
        // An all-empty set of rows would produce a 0-column array
        // and the rt axis check below reports it properly.
        let intensities = Array2D::new(&rows)?;
        Self::try_new(mass, retention_time, intensities)
    }

    pub fn mass_axis(&self) -> &[f64] {
        &self.mass
    }

    pub fn rt_axis(&self) -> &[f64] {
        &self.retention_time
    }

    /// Shared handle on the retention time axis, every extracted
    /// chromatogram points at the same allocation.
    pub fn shared_rt_axis(&self) -> Arc<[f64]> {
        self.retention_time.clone()
    }

    pub fn n_mass(&self) -> usize {
        self.mass.len()
    }

    pub fn n_rt(&self) -> usize {
        self.retention_time.len()
    }

    /// Intensity at (mass row, rt column), `0.0` when out of bounds.
    pub fn intensity(&self, mass_index: usize, rt_index: usize) -> f32 {
        self.intensities.get(mass_index, rt_index).unwrap_or(0.0)
    }

    /// All intensities of one mass row across retention time.
    pub fn mass_row(&self, mass_index: usize) -> Option<&[f32]> {
        self.intensities.get_row(mass_index)
    }

    /// Intensities of every mass at one retention time column.
    pub fn rt_column(&self, rt_index: usize) -> impl Iterator<Item = f32> + '_ {
        self.intensities.iter_column(rt_index)
    }

    pub fn nearest_mass_index(&self, mass: f64) -> usize {
        nearest_index(&self.mass, mass).expect("mass axis is validated to be non-empty")
    }

    pub fn nearest_rt_index(&self, rt: f64) -> usize {
        nearest_index(&self.retention_time, rt)
            .expect("retention time axis is validated to be non-empty")
    }

    pub fn mass_range(&self) -> TupleRange<f64> {
        // Both reads are safe, the axis is non-empty and sorted.
        TupleRange::try_new(self.mass[0], self.mass[self.mass.len() - 1])
            .expect("mass axis is validated to be sorted")
    }

    pub fn rt_range(&self) -> TupleRange<f64> {
        TupleRange::try_new(
            self.retention_time[0],
            self.retention_time[self.retention_time.len() - 1],
        )
        .expect("retention time axis is validated to be sorted")
    }

    /// Sum the intensities of a block of mass rows for every retention time.
    ///
    /// The row range is clipped to the matrix, an empty (or fully out of
    /// bounds) range yields an all-zero trace of the right length.
    pub fn sum_mass_rows(&self, rows: Range<usize>) -> Vec<f64> {
        let mut out = vec![0.0f64; self.n_rt()];
        let end = rows.end.min(self.n_mass());
        let start = rows.start.min(end);
        for mass_index in start..end {
            if let Some(row) = self.intensities.get_row(mass_index) {
                for (acc, v) in out.iter_mut().zip(row.iter()) {
                    *acc += *v as f64;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_matrix() -> IntensityMatrix {
        IntensityMatrix::from_rows(
            vec![100.0, 100.001, 100.002],
            vec![1.0, 1.01, 1.02, 1.03],
            vec![
                vec![1.0, 2.0, 3.0, 4.0],
                vec![10.0, 20.0, 30.0, 40.0],
                vec![100.0, 200.0, 300.0, 400.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_sum_mass_rows() {
        let m = small_matrix();
        assert_eq!(m.sum_mass_rows(0..2), vec![11.0, 22.0, 33.0, 44.0]);
        assert_eq!(m.sum_mass_rows(1..10), vec![110.0, 220.0, 330.0, 440.0]);
        assert_eq!(m.sum_mass_rows(2..2), vec![0.0; 4]);
        assert_eq!(m.sum_mass_rows(5..9), vec![0.0; 4]);
    }

    #[test]
    fn test_column_and_lookup() {
        let m = small_matrix();
        assert_eq!(m.rt_column(1).collect::<Vec<_>>(), vec![2.0, 20.0, 200.0]);
        assert_eq!(m.nearest_rt_index(1.014), 1);
        assert_eq!(m.nearest_mass_index(100.0019), 2);
        assert_eq!(m.mass_range().as_tuple(), (100.0, 100.002));
    }

    #[test]
    fn test_shape_errors() {
        let empty = IntensityMatrix::from_rows(vec![], vec![1.0], vec![]);
        assert_eq!(
            empty.unwrap_err(),
            DataShapeError::EmptyAxis { axis: Axis::Mass }
        );

        let no_rt = IntensityMatrix::from_rows(vec![1.0], vec![], vec![vec![]]);
        assert_eq!(
            no_rt.unwrap_err(),
            DataShapeError::EmptyAxis {
                axis: Axis::RetentionTime
            }
        );

        let dup_rt = IntensityMatrix::from_rows(vec![1.0], vec![1.0, 1.0], vec![vec![0.0, 0.0]]);
        assert!(matches!(
            dup_rt.unwrap_err(),
            DataShapeError::NonMonotonicAxis {
                axis: Axis::RetentionTime,
                index: 1,
                ..
            }
        ));

        let negative = IntensityMatrix::from_rows(vec![1.0], vec![1.0, 2.0], vec![vec![0.0, -1.0]]);
        assert!(matches!(
            negative.unwrap_err(),
            DataShapeError::InvalidIntensity {
                mass_index: 0,
                rt_index: 1,
                ..
            }
        ));

        let ragged = IntensityMatrix::from_rows(
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![vec![0.0, 1.0], vec![0.0]],
        );
        assert!(matches!(
            ragged.unwrap_err(),
            DataShapeError::RaggedRow { row: 1, .. }
        ));
    }
}
