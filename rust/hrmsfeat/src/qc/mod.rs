//! Quality control helpers that do not take part in feature extraction.

pub mod kendrick;
pub mod mass_accuracy;

pub use kendrick::{
    KendrickMass,
    exchange_mass_defect,
    kendrick_mass_defect,
};
pub use mass_accuracy::{
    MassAccuracy,
    evaluate_mass_accuracy,
};
