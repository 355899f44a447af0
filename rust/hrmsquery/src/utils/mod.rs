pub mod nearest;
pub mod tolerance_ranges;

pub use nearest::nearest_index;
pub use tolerance_ranges::{
    TupleRange,
    abs_tol_range,
    ppm_tol_range,
};
