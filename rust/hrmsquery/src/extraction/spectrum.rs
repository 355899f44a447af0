use crate::models::IntensityMatrix;

/// Mass spectrum at a single retention time column of a matrix.
#[derive(Debug, Clone)]
pub struct Spectrum<'a> {
    pub rt_index: usize,
    pub retention_time: f64,
    pub mass: &'a [f64],
    pub intensity: Vec<f32>,
}

impl Spectrum<'_> {
    pub fn len(&self) -> usize {
        self.mass.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mass.is_empty()
    }
}

/// The spectrum of the retention time column nearest `rt`.
pub fn spectrum_at_rt(matrix: &IntensityMatrix, rt: f64) -> Spectrum<'_> {
    let rt_index = matrix.nearest_rt_index(rt);
    spectrum_at_index(matrix, rt_index).expect("nearest rt index is within the axis")
}

fn spectrum_at_index(matrix: &IntensityMatrix, rt_index: usize) -> Option<Spectrum<'_>> {
    let retention_time = *matrix.rt_axis().get(rt_index)?;
    Some(Spectrum {
        rt_index,
        retention_time,
        mass: matrix.mass_axis(),
        intensity: matrix.rt_column(rt_index).collect(),
    })
}

impl IntensityMatrix {
    /// Spectrum at a retention time column, `None` past the end of the axis.
    pub fn spectrum_at_index(&self, rt_index: usize) -> Option<Spectrum<'_>> {
        spectrum_at_index(self, rt_index)
    }
}
