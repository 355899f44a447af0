mod matrix_io;

pub use matrix_io::{
    IntensityMatrixInput,
    read_intensity_matrix,
    write_intensity_matrix_csv,
    write_intensity_matrix_json,
};
