use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    info,
};

use crate::errors::DataReadingError;
use crate::models::IntensityMatrix;

/// JSON layout of an intensity matrix on disk.
///
/// `intensities` holds one row per mass, each row one value per retention time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntensityMatrixInput {
    pub mass: Vec<f64>,
    pub retention_time: Vec<f64>,
    pub intensities: Vec<Vec<f32>>,
}

impl From<&IntensityMatrix> for IntensityMatrixInput {
    fn from(matrix: &IntensityMatrix) -> Self {
        let intensities = (0..matrix.n_mass())
            .map(|i| matrix.mass_row(i).map(|r| r.to_vec()).unwrap_or_default())
            .collect();
        Self {
            mass: matrix.mass_axis().to_vec(),
            retention_time: matrix.rt_axis().to_vec(),
            intensities,
        }
    }
}

/// Read an intensity matrix, the format is picked from the extension.
///
/// `.json` files are read as [`IntensityMatrixInput`]. Anything else is
/// read as a dense CSV whose header is `mass,<rt_0>,<rt_1>,...` and
/// whose rows are `<mass>,<intensity_0>,<intensity_1>,...`.
pub fn read_intensity_matrix(path: impl AsRef<Path>) -> Result<IntensityMatrix, DataReadingError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let matrix = if is_json {
        read_json(path)?
    } else {
        read_dense_csv(path)?
    };
    info!(
        "Read intensity matrix from {} ({} masses x {} retention times)",
        path.display(),
        matrix.n_mass(),
        matrix.n_rt()
    );
    Ok(matrix)
}

fn read_json(path: &Path) -> Result<IntensityMatrix, DataReadingError> {
    let file = std::fs::File::open(path).map_err(|source| DataReadingError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    let reader = std::io::BufReader::new(file);
    let input: IntensityMatrixInput =
        serde_json::from_reader(reader).map_err(|source| DataReadingError::Json {
            source,
            path: path.to_path_buf(),
        })?;
    IntensityMatrix::from_rows(input.mass, input.retention_time, input.intensities).map_err(
        |source| DataReadingError::Shape {
            source,
            path: path.to_path_buf(),
        },
    )
}

fn read_dense_csv(path: &Path) -> Result<IntensityMatrix, DataReadingError> {
    let csv_err = |source: csv::Error| DataReadingError::Csv {
        source,
        path: path.to_path_buf(),
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?.clone();
    let retention_time = headers
        .iter()
        .skip(1)
        .map(|field| {
            field
                .trim()
                .parse::<f64>()
                .map_err(|e| DataReadingError::Malformed {
                    path: path.to_path_buf(),
                    line: 1,
                    msg: format!("retention time header '{}': {}", field, e),
                })
        })
        .collect::<Result<Vec<f64>, _>>()?;
    debug!("Header of {} has {} retention times", path.display(), retention_time.len());

    let mut mass = Vec::new();
    let mut rows: Vec<Vec<f32>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let malformed = |msg: String| DataReadingError::Malformed {
            path: path.to_path_buf(),
            line,
            msg,
        };

        let mut fields = record.iter();
        let mass_field = fields
            .next()
            .ok_or_else(|| malformed("empty row".to_string()))?;
        let m = mass_field
            .trim()
            .parse::<f64>()
            .map_err(|e| malformed(format!("mass '{}': {}", mass_field, e)))?;
        let row = fields
            .map(|f| {
                f.trim()
                    .parse::<f32>()
                    .map_err(|e| malformed(format!("intensity '{}': {}", f, e)))
            })
            .collect::<Result<Vec<f32>, _>>()?;
        mass.push(m);
        rows.push(row);
    }

    IntensityMatrix::from_rows(mass, retention_time, rows).map_err(|source| {
        DataReadingError::Shape {
            source,
            path: path.to_path_buf(),
        }
    })
}

pub fn write_intensity_matrix_json(
    matrix: &IntensityMatrix,
    path: impl AsRef<Path>,
) -> Result<(), DataReadingError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|source| DataReadingError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer(writer, &IntensityMatrixInput::from(matrix)).map_err(|source| {
        DataReadingError::Json {
            source,
            path: path.to_path_buf(),
        }
    })
}

pub fn write_intensity_matrix_csv(
    matrix: &IntensityMatrix,
    path: impl AsRef<Path>,
) -> Result<(), DataReadingError> {
    let path = path.as_ref();
    let csv_err = |source: csv::Error| DataReadingError::Csv {
        source,
        path: path.to_path_buf(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;

    let mut header = Vec::with_capacity(matrix.n_rt() + 1);
    header.push("mass".to_string());
    header.extend(matrix.rt_axis().iter().map(|rt| rt.to_string()));
    writer.write_record(&header).map_err(csv_err)?;

    for (mi, m) in matrix.mass_axis().iter().enumerate() {
        let mut record = Vec::with_capacity(matrix.n_rt() + 1);
        record.push(m.to_string());
        if let Some(row) = matrix.mass_row(mi) {
            record.extend(row.iter().map(|v| v.to_string()));
        }
        writer.write_record(&record).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| DataReadingError::Io {
        source,
        path: path.to_path_buf(),
    })
}
