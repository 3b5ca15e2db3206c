//! Gaussian plume physics: dispersion coefficients and the per-receptor
//! contribution. Both are pure functions so they can be tested and reused
//! independently of the grid updaters.

#[allow(clippy::module_name_repetitions)]
pub mod coefficients;
pub mod plume;

pub use coefficients::{
    class_parameters, coefficients, sigmas_from_parameters, DispersionScheme, Sigmas,
    DISTANCE_DAMPING, HISTORICAL_D_COEFFICIENTS, NEUTRAL_COEFFICIENTS,
};
pub use plume::{angular_distance, contribution, lateral_factor, vertical_factor};
