use crate::errors::DataShapeError;

/// Simple dense 2D array.
///
/// `values` is a flattened array of values
/// `major_dim` is the number of values in each row
/// `minor_dim` is the number of rows
///
/// Note on memory layout:
///
/// Values that belong to the same row are adjacent
/// in memory. For an intensity matrix a row is one mass,
/// so summing a block of rows (a chromatogram) walks
/// contiguous memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Array2D<T: Clone + Copy> {
    pub(crate) values: Vec<T>,
    pub(crate) major_dim: usize,
    pub(crate) minor_dim: usize,
}

impl<T: Clone + Copy> Array2D<T> {
    /// Build from a slice of rows, every row must have the same length.
    ///
    /// ```
    /// use hrmsquery::Array2D;
    /// let array = Array2D::new(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    /// assert_eq!(array.nrows(), 2);
    /// assert_eq!(array.ncols(), 3);
    /// assert_eq!(array.get(1, 0), Some(4));
    /// ```
    pub fn new<S: AsRef<[T]>, C: AsRef<[S]>>(values: C) -> Result<Array2D<T>, DataShapeError> {
        let rows = values.as_ref();
        let nrows = rows.len();
        let ncols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);

        let mut flat: Vec<T> = Vec::with_capacity(nrows * ncols);
        for (ri, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != ncols {
                return Err(DataShapeError::RaggedRow {
                    row: ri,
                    real: row.len(),
                    expected: ncols,
                });
            }
            flat.extend_from_slice(row);
        }

        Ok(Array2D {
            values: flat,
            major_dim: ncols,
            minor_dim: nrows,
        })
    }

    pub fn from_flat_vector(
        values: Vec<T>,
        nrows: usize,
        ncols: usize,
    ) -> Result<Array2D<T>, DataShapeError> {
        if values.len() != nrows * ncols {
            return Err(DataShapeError::ExpectedVectorLength {
                real: values.len(),
                expected: nrows * ncols,
            });
        }
        Ok(Array2D {
            values,
            major_dim: ncols,
            minor_dim: nrows,
        })
    }

    pub fn get_row(&self, index: usize) -> Option<&[T]> {
        let start = index * self.major_dim;
        let end = start + self.major_dim;
        if end > self.values.len() || start >= self.values.len() {
            return None;
        }
        Some(&self.values[start..end])
    }

    pub fn get(&self, row_idx: usize, col_idx: usize) -> Option<T> {
        if row_idx >= self.minor_dim || col_idx >= self.major_dim {
            return None;
        }
        Some(self.values[row_idx * self.major_dim + col_idx])
    }

    /// Iterate the values of a single column, top to bottom.
    ///
    /// Yields nothing when the column is out of bounds.
    pub fn iter_column(&self, col_idx: usize) -> impl Iterator<Item = T> + '_ {
        let take = if col_idx < self.major_dim {
            self.minor_dim
        } else {
            0
        };
        self.values
            .iter()
            .skip(col_idx)
            .step_by(self.major_dim.max(1))
            .take(take)
            .copied()
    }

    pub fn nrows(&self) -> usize {
        self.minor_dim
    }

    pub fn ncols(&self) -> usize {
        self.major_dim
    }

    pub fn as_flat_slice(&self) -> &[T] {
        &self.values
    }
}
