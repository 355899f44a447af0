/// Index of the value in a sorted (ascending) axis closest to `value`.
///
/// Ties resolve to the lower index, so a value exactly half way between
/// two axis points maps onto the left one. Returns `None` for an empty axis.
///
/// ```
/// use hrmsquery::utils::nearest_index;
///
/// let axis = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(nearest_index(&axis, 2.4), Some(1));
/// assert_eq!(nearest_index(&axis, 2.5), Some(1));
/// assert_eq!(nearest_index(&axis, -10.0), Some(0));
/// assert_eq!(nearest_index(&axis, 100.0), Some(3));
/// assert_eq!(nearest_index(&[], 1.0), None);
/// ```
pub fn nearest_index(axis: &[f64], value: f64) -> Option<usize> {
    if axis.is_empty() {
        return None;
    }
    let right = axis.partition_point(|x| *x < value);
    if right == 0 {
        return Some(0);
    }
    if right == axis.len() {
        return Some(axis.len() - 1);
    }
    let left = right - 1;
    if (value - axis[left]).abs() <= (axis[right] - value).abs() {
        Some(left)
    } else {
        Some(right)
    }
}
