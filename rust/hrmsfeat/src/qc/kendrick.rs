//! Kendrick mass defect.
//!
//! Rescaling masses by `nominal / exact` of a repeating unit gives every
//! member of a homologous series (same core, differing by n units) the same
//! defect. Unit masses come from a formula tool, only the numbers are
//! needed here.
//!
//! Two conventions are supported:
//!
//! - a single repeating unit (`CH2`, `CF2`): the defect is the Kendrick
//!   mass minus the integer part of the measured mass, so it can be
//!   negative.
//! - an exchange of one group for another (`Br/H`): the scale is built
//!   from the exact mass difference of the two groups and the defect is
//!   the fractional part of the Kendrick mass.

/// Repeating units, exact and nominal mass.
pub mod units {
    /// CH2 (methylene).
    pub const CH2_EXACT: f64 = 14.015_650_64;
    pub const CH2_NOMINAL: f64 = 14.0;
    /// CF2 (perfluoromethylene).
    pub const CF2_EXACT: f64 = 49.996_806_03;
    pub const CF2_NOMINAL: f64 = 50.0;
    /// Br/H exchange, 79Br minus 1H.
    pub const BR_H_EXACT: f64 = 77.910_512_07;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KendrickMass {
    pub mass: f64,
    pub kendrick_mass: f64,
    pub defect: f64,
}

/// Kendrick mass and defect for a single repeating unit, in input order.
///
/// The defect is `kendrick_mass - floor(mass)`.
///
/// ```
/// use hrmsfeat::qc::kendrick::{
///     kendrick_mass_defect,
///     units,
/// };
///
/// // Two masses one CH2 apart
/// let masses = [100.0, 100.0 + units::CH2_EXACT];
/// let kmd = kendrick_mass_defect(&masses, units::CH2_EXACT, units::CH2_NOMINAL);
/// assert!((kmd[1].kendrick_mass - kmd[0].kendrick_mass - 14.0).abs() < 1e-9);
/// assert!((kmd[0].defect - kmd[1].defect).abs() < 1e-9);
/// assert!(kmd[0].defect < 0.0);
/// ```
pub fn kendrick_mass_defect(masses: &[f64], exact_unit: f64, nominal_unit: f64) -> Vec<KendrickMass> {
    let scale = nominal_unit / exact_unit;
    masses
        .iter()
        .map(|&mass| {
            let kendrick_mass = mass * scale;
            KendrickMass {
                mass,
                kendrick_mass,
                defect: kendrick_mass - mass.floor(),
            }
        })
        .collect()
}

/// Kendrick mass and defect for the exchange of one group for another.
///
/// `exact_difference` is the exact mass difference of the two groups. The
/// scale is the larger of the difference and its rounded value over the
/// smaller one, and the defect is the fractional part of the Kendrick mass,
/// in `[0, 1)`.
pub fn exchange_mass_defect(masses: &[f64], exact_difference: f64) -> Vec<KendrickMass> {
    let difference = exact_difference.abs();
    let nominal = difference.round();
    let scale = difference.max(nominal) / difference.min(nominal);
    masses
        .iter()
        .map(|&mass| {
            let kendrick_mass = mass * scale;
            KendrickMass {
                mass,
                kendrick_mass,
                defect: kendrick_mass - kendrick_mass.floor(),
            }
        })
        .collect()
}
