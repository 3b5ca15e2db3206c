//! Post-processing of concentration grids: aggregate summaries and model
//! evaluation against observations.

pub mod evaluation;
#[allow(clippy::module_name_repetitions)]
pub mod summary;

pub use evaluation::{SeriesStats, ValidationMetrics};
pub use summary::GridSummary;
