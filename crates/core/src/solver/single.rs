//! Single-source grid updater
//!
//! Visits every cell of a window, skips receptors inside the near-field
//! exclusion zone or beyond the far-field cutoff, and adds the Gaussian plume
//! contribution of one source in place.

use crate::config::KernelConfig;
use crate::core_types::{Atmosphere, PointSource};
use crate::dispersion::coefficients::sigmas_from_parameters;
use crate::dispersion::plume::weighted_contribution;
use crate::error::KernelError;
use crate::grid::{GridGeometry, GridView, Window};
use std::f64::consts::TAU;

/// Add the plume of one source to the cells of `window`
///
/// # Arguments
///
/// * `grid` - Host-owned concentration grid, `resolution × resolution`
/// * `window` - Cells to visit; must lie inside the grid
/// * `source` - Source position, emission rate and plume height
/// * `atmosphere` - Wind and stability class
/// * `geometry` - World bounds of the grid
/// * `config` - Cutoffs and dispersion scheme
///
/// # Errors
///
/// Fails before touching the grid if the configuration, geometry, grid shape,
/// window or source parameters are invalid.
pub fn update_single(
    grid: &mut GridView<'_>,
    window: Window,
    source: &PointSource,
    atmosphere: &Atmosphere,
    geometry: &GridGeometry,
    config: &KernelConfig,
) -> Result<(), KernelError> {
    config.validate()?;
    grid.check_geometry(geometry)?;
    window.validate(grid.rows(), grid.cols())?;
    source.validate()?;
    config.scheme.announce();

    let cols = grid.cols();
    accumulate_source(
        grid.as_mut_slice(),
        cols,
        &window,
        geometry,
        source,
        atmosphere,
        config,
    );
    Ok(())
}

/// Hot loop shared by every updater; inputs must already be validated
///
/// `cells` is a row-major buffer with `cols` columns laid out like the grid,
/// either the grid itself or a scratch buffer of the same shape.
#[inline]
pub(crate) fn accumulate_source(
    cells: &mut [f64],
    cols: usize,
    window: &Window,
    geometry: &GridGeometry,
    source: &PointSource,
    atmosphere: &Atmosphere,
    config: &KernelConfig,
) {
    if window.is_empty() {
        return;
    }

    let parameters = config.scheme.parameters(atmosphere.stability());
    let wind_direction = atmosphere.wind_direction();
    let strength = source.emission_rate / (TAU * atmosphere.wind_speed());
    let near_sq = config.near_cutoff * config.near_cutoff;
    let far = config.far_cutoff;
    let cell_width = geometry.cell_width();
    let cell_height = geometry.cell_height();

    for row in window.row_min..window.row_max {
        let receptor_y = geometry.y_min + (row as f64 + 0.5) * cell_height;
        let dy = receptor_y - source.y;
        let start = row * cols;
        let line = &mut cells[start + window.col_min..start + window.col_max];

        for (offset, cell) in line.iter_mut().enumerate() {
            let col = window.col_min + offset;
            let receptor_x = geometry.x_min + (col as f64 + 0.5) * cell_width;
            let dx = receptor_x - source.x;
            let distance_sq = dx * dx + dy * dy;

            if distance_sq < near_sq {
                continue;
            }
            let distance = distance_sq.sqrt();
            if distance > far {
                continue;
            }

            let sigmas = sigmas_from_parameters(parameters, distance);
            *cell += weighted_contribution(
                dx,
                dy,
                wind_direction,
                sigmas.sigma_y,
                sigmas.sigma_z,
                source.plume_height,
                strength,
            );
        }
    }
}
