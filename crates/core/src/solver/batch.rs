//! Multi-source batch updater
//!
//! One batch is one simulation tick: every cell decays by the retention factor,
//! then each vehicle adds its plume within a square window around itself.
//!
//! Two strategies produce the same field up to floating-point reassociation:
//!
//! - [`update_batch`] decays in parallel and accumulates sources one after
//!   another, so the result is bit-for-bit reproducible for a given order.
//! - [`update_batch_parallel`] folds sources into per-worker scratch buffers
//!   and reduces them, trading memory for throughput on large fleets.

use super::single::accumulate_source;
use crate::config::KernelConfig;
use crate::core_types::{Atmosphere, VehicleSource};
use crate::error::KernelError;
use crate::grid::{GridGeometry, GridView, Window};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Decay the grid and add every vehicle's plume
///
/// # Arguments
///
/// * `grid` - Concentration grid, `resolution × resolution`
/// * `sources` - Vehicles, possibly empty
/// * `atmosphere` - Wind and stability class shared by all sources
/// * `emission_factor` - Global multiplier on vehicle emission rates
/// * `geometry` - World bounds of the grid
/// * `config` - Retention factor, influence radius, cutoffs and emission model
///
/// # Errors
///
/// Every input is checked before the grid is touched, so on error the grid is
/// exactly as it was. Fails on an invalid configuration, geometry or grid
/// shape, a non-finite or negative emission factor, or a malformed source.
pub fn update_batch(
    grid: &mut GridView<'_>,
    sources: &[VehicleSource],
    atmosphere: &Atmosphere,
    emission_factor: f64,
    geometry: &GridGeometry,
    config: &KernelConfig,
) -> Result<(), KernelError> {
    prepare(grid, sources, emission_factor, geometry, config, "sequential")?;
    decay(grid, config.retention_factor);

    let (rows, cols) = (grid.rows(), grid.cols());
    let cells = grid.as_mut_slice();
    for vehicle in sources {
        let source = config.emission.point_source(vehicle, emission_factor);
        let window = Window::around(
            vehicle.x,
            vehicle.y,
            config.influence_radius,
            geometry,
            rows,
            cols,
        );
        trace!(
            "Source ({:.1}, {:.1}) q={:.4} h={:.2} window {:?}",
            source.x,
            source.y,
            source.emission_rate,
            source.plume_height,
            window
        );
        accumulate_source(cells, cols, &window, geometry, &source, atmosphere, config);
    }

    Ok(())
}

/// [`update_batch`] with sources accumulated on the rayon pool
///
/// Each worker owns a zeroed scratch buffer the size of the grid; buffers are
/// summed pairwise and the total is added to the decayed grid. Cells outside
/// every window receive `+ 0.0` and keep their decayed value exactly.
///
/// # Errors
///
/// Same conditions as [`update_batch`]; the grid is untouched on error.
pub fn update_batch_parallel(
    grid: &mut GridView<'_>,
    sources: &[VehicleSource],
    atmosphere: &Atmosphere,
    emission_factor: f64,
    geometry: &GridGeometry,
    config: &KernelConfig,
) -> Result<(), KernelError> {
    prepare(grid, sources, emission_factor, geometry, config, "parallel")?;
    decay(grid, config.retention_factor);

    let (rows, cols) = (grid.rows(), grid.cols());
    let len = rows * cols;

    let totals = sources
        .par_iter()
        .fold(
            || vec![0.0_f64; len],
            |mut scratch, vehicle| {
                let source = config.emission.point_source(vehicle, emission_factor);
                let window = Window::around(
                    vehicle.x,
                    vehicle.y,
                    config.influence_radius,
                    geometry,
                    rows,
                    cols,
                );
                accumulate_source(
                    &mut scratch,
                    cols,
                    &window,
                    geometry,
                    &source,
                    atmosphere,
                    config,
                );
                scratch
            },
        )
        .reduce_with(|mut acc, other| {
            acc.iter_mut().zip(&other).for_each(|(a, b)| *a += b);
            acc
        });

    if let Some(totals) = totals {
        grid.as_mut_slice()
            .par_iter_mut()
            .zip(totals.par_iter())
            .for_each(|(cell, added)| *cell += added);
    }

    Ok(())
}

/// Validate everything a batch touches; nothing is mutated here
fn prepare(
    grid: &GridView<'_>,
    sources: &[VehicleSource],
    emission_factor: f64,
    geometry: &GridGeometry,
    config: &KernelConfig,
    strategy: &str,
) -> Result<(), KernelError> {
    config.validate()?;
    grid.check_geometry(geometry)?;
    if !emission_factor.is_finite() || emission_factor < 0.0 {
        return Err(KernelError::InvalidParameter {
            name: "emission_factor",
            value: emission_factor,
        });
    }
    for (index, vehicle) in sources.iter().enumerate() {
        vehicle.validate(index)?;
    }
    config.scheme.announce();

    debug!(
        "Batch update ({}): {} sources on {}x{} grid, retention {}",
        strategy,
        sources.len(),
        grid.rows(),
        grid.cols(),
        config.retention_factor
    );
    Ok(())
}

/// Multiply every cell by `retention`
fn decay(grid: &mut GridView<'_>, retention: f64) {
    let cols = grid.cols();
    grid.as_mut_slice()
        .par_chunks_mut(cols)
        .for_each(|row| row.iter_mut().for_each(|cell| *cell *= retention));
}
