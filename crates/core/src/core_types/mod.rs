//! Core value types passed into the kernel on every call

#[allow(clippy::module_name_repetitions)]
pub mod atmosphere;
#[allow(clippy::module_name_repetitions)]
pub mod source;

pub use atmosphere::{normalize_angle, Atmosphere, StabilityClass};
pub use source::{EmissionModel, PointSource, VehicleSource};
