//! Gaussian Plume Dispersion Kernel
//!
//! Numerical core of an urban traffic-pollution simulator. Vehicles are point
//! sources whose emissions are spread over a 2D concentration grid with a
//! steady-state Gaussian plume model, blended over time with exponential decay.
//!
//! ## Components
//!
//! - [`dispersion`]: stability-dependent `σ_y`/`σ_z` and the per-receptor plume term
//! - [`grid`]: grid geometry, borrowed grid views and per-source index windows
//! - [`solver`]: single-source and batch grid updaters
//! - [`analysis`]: grid summaries and model evaluation statistics
//!
//! The host owns the grid buffer; every updater mutates it in place and
//! validates its inputs before the first write.

// Core types and utilities
pub mod config;
pub mod core_types;
#[allow(clippy::module_name_repetitions)]
pub mod error;

// Physics and grid updaters
pub mod dispersion;
pub mod grid;
pub mod solver;

// Post-processing
pub mod analysis;

// Re-export core types
pub use config::{KernelConfig, ScenarioSettings};
pub use core_types::{Atmosphere, EmissionModel, PointSource, StabilityClass, VehicleSource};
pub use error::KernelError;

// Re-export grid and physics types
pub use dispersion::{coefficients, contribution, DispersionScheme, Sigmas};
pub use grid::{ConcentrationField, GridGeometry, GridView, Window};
pub use solver::{update_batch, update_batch_parallel, update_single};

// Re-export analysis types
pub use analysis::{GridSummary, SeriesStats, ValidationMetrics};
