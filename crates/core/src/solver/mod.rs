//! Grid updaters
//!
//! All updaters mutate a host-owned [`GridView`](crate::grid::GridView) in
//! place and validate every input before the first write, so a failed call
//! leaves the grid unchanged.
//!
//! # Example
//!
//! ```rust,ignore
//! use plume_core::{Atmosphere, ConcentrationField, GridGeometry, KernelConfig};
//! use plume_core::{StabilityClass, VehicleSource};
//! use plume_core::solver::update_batch;
//!
//! let geometry = GridGeometry::new(0.0, 1000.0, 0.0, 1000.0, 100)?;
//! let atmosphere = Atmosphere::new(2.0, 0.0, StabilityClass::B)?;
//! let mut field = ConcentrationField::for_geometry(&geometry);
//! let vehicles = [VehicleSource::new(500.0, 500.0, 30.0)];
//! update_batch(
//!     &mut field.view_mut()?,
//!     &vehicles,
//!     &atmosphere,
//!     0.5,
//!     &geometry,
//!     &KernelConfig::default(),
//! )?;
//! ```

#[allow(clippy::module_name_repetitions)]
mod batch;
#[allow(clippy::module_name_repetitions)]
mod single;

pub use batch::{update_batch, update_batch_parallel};
pub use single::update_single;
