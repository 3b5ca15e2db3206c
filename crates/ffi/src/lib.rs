//! C ABI for the plume dispersion kernel.
//!
//! Hosts pass their own concentration grid buffer on every call; nothing is
//! allocated or retained across calls. Every function returns a
//! [`PlumeErrorCode`], and on failure the message is available from
//! [`plume_get_last_error`] on the same thread.

mod dispersion;
mod error;
mod helpers;

pub use dispersion::{
    plume_compute_window, plume_default_config, plume_emission_rate, plume_grid_summary,
    plume_plume_height, plume_update_batch, plume_update_batch_parallel, plume_update_single,
    PlumeDispersionScheme, PlumeGridGeometry, PlumeGridSummary, PlumeKernelConfig, PlumeVehicle,
    PlumeWindow,
};
pub use error::{plume_get_last_error, plume_get_last_error_code, PlumeErrorCode};
