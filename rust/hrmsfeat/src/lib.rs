#![doc = include_str!("../README.md")]

pub mod alignment;
pub mod background;
pub mod detection;
pub mod errors;
pub mod isotopes;
pub mod matrix;
pub mod picking;
pub mod qc;
pub mod qualification;
pub mod tables;
pub mod utils;

pub use alignment::{
    AlignedPeakRecord,
    Alignment,
    AlignmentConfig,
    FeatureAligner,
    ReferenceFeature,
    feature_id,
};
pub use background::estimate_background;
pub use detection::PeakDetector;
pub use errors::{
    AlignmentError,
    HrmsFeatError,
    Result,
};
pub use matrix::{
    FeatureMatrix,
    FeatureMatrixBuilder,
    ValueSelector,
};
pub use picking::{
    FilePeaks,
    PickingConfig,
    RawPeak,
    process_matrix,
};
pub use qualification::{
    PeakQualifier,
    QualificationConfig,
    QualifiedPeak,
};
