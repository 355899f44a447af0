use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// TupleRange represents a range defined by a tuple of two elements (T, T).
///
/// It represents a range as closed-closed [a, b], meaning both endpoints are inclusive.
/// Importantly, it ensures that the first element is always less than or equal to the second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TupleRange<T: Copy + PartialOrd>(T, T);

#[derive(Error, Debug)]
pub enum TupleRangeError<T: Copy + PartialOrd + std::fmt::Debug> {
    #[error(
        "Expected the first element to be less than or equal to the second, got ({0:?}, {1:?})"
    )]
    ExpectedOrderedRange(T, T),
}

impl<T: Copy + PartialOrd + std::fmt::Debug> TupleRange<T> {
    pub fn try_new(left: T, right: T) -> Result<Self, TupleRangeError<T>> {
        if left > right {
            Err(TupleRangeError::ExpectedOrderedRange(left, right))
        } else {
            Ok(Self(left, right))
        }
    }

    pub fn as_tuple(&self) -> (T, T) {
        (self.0, self.1)
    }

    pub fn contains(&self, x: T) -> bool {
        self.0 <= x && x <= self.1
    }

    pub fn start(&self) -> T {
        self.0
    }

    pub fn end(&self) -> T {
        self.1
    }
}

impl<T> TryInto<TupleRange<T>> for (T, T)
where
    T: Copy + PartialOrd + std::fmt::Debug,
{
    type Error = TupleRangeError<T>;

    fn try_into(self) -> Result<TupleRange<T>, Self::Error> {
        TupleRange::try_new(self.0, self.1)
    }
}

/// Symmetric ppm window around a value: `elem * (1 -/+ tol_ppm * 1e-6)`.
///
/// A negative tolerance is treated as its absolute value.
///
/// ```
/// use hrmsquery::utils::ppm_tol_range;
///
/// let range = ppm_tol_range(200.0, 50.0);
/// assert!((range.start() - 199.99).abs() < 1e-9);
/// assert!((range.end() - 200.01).abs() < 1e-9);
/// ```
pub fn ppm_tol_range(elem: f64, tol_ppm: f64) -> TupleRange<f64> {
    let factor = tol_ppm.abs() * 1e-6;
    let left_e = elem * (1.0 - factor);
    let right_e = elem * (1.0 + factor);
    // Negative masses would flip the order.
    if left_e <= right_e {
        TupleRange(left_e, right_e)
    } else {
        TupleRange(right_e, left_e)
    }
}

/// Absolute window around a value, `[elem - tol, elem + tol]`.
pub fn abs_tol_range(elem: f64, tol: f64) -> TupleRange<f64> {
    let tol = tol.abs();
    TupleRange(elem - tol, elem + tol)
}
