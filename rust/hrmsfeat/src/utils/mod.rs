pub mod stats;

pub use stats::{
    mean,
    median,
    population_std,
    round_to,
    simpson,
};
