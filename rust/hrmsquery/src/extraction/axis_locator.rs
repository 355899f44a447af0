use std::ops::Range;

/// Partitions a sorted mass axis into ppm-scaled bins.
///
/// A single pass keeps a "locator" value, starting at the first mass.
/// Whenever the current mass exceeds the locator, its index becomes a
/// breakpoint and the locator is scaled by `1 + ppm * 1e-6`.
///
/// Consecutive breakpoints delimit the bins. Rows before the first
/// breakpoint and from the last breakpoint onward do not belong to any bin.
///
/// ```
/// use hrmsquery::extraction::AxisLocator;
///
/// let axis = [100.0, 100.001, 100.002, 100.003, 100.008, 100.0105];
/// let locator = AxisLocator::new(&axis, 50.0);
/// assert_eq!(locator.breakpoints(), &[1, 4, 5]);
/// assert_eq!(locator.bins().collect::<Vec<_>>(), vec![1..4, 4..5]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLocator {
    breakpoints: Vec<usize>,
}

impl AxisLocator {
    pub fn new(mass_axis: &[f64], ppm: f64) -> Self {
        let mut breakpoints = Vec::new();
        let Some(first) = mass_axis.first() else {
            return Self { breakpoints };
        };
        let scale = 1.0 + ppm * 1e-6;
        let mut locator = *first;
        for (i, mass) in mass_axis.iter().enumerate() {
            if *mass > locator {
                breakpoints.push(i);
                locator *= scale;
            }
        }
        Self { breakpoints }
    }

    pub fn breakpoints(&self) -> &[usize] {
        &self.breakpoints
    }

    /// Row ranges `[breakpoint_i, breakpoint_{i+1})`.
    pub fn bins(&self) -> impl ExactSizeIterator<Item = Range<usize>> + '_ {
        self.breakpoints.windows(2).map(|w| w[0]..w[1])
    }

    pub fn num_bins(&self) -> usize {
        self.breakpoints.len().saturating_sub(1)
    }
}
