//! Concentration grid, its world geometry and per-source index windows

pub mod field;
#[allow(clippy::module_name_repetitions)]
pub mod geometry;
#[allow(clippy::module_name_repetitions)]
pub mod window;

// Re-export main types
pub use field::{ConcentrationField, GridView};
pub use geometry::GridGeometry;
pub use window::Window;
