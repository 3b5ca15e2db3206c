//! FFI entry points for the plume kernel.
//!
//! The host owns the concentration grid: a contiguous row-major `double`
//! buffer of `rows * cols` cells, borrowed mutably for the duration of each
//! call and never retained. Row `i` runs along y and column `j` along x.

use std::os::raw::c_char;
use std::slice;

use plume_core::config::constants;
use plume_core::{
    update_batch, update_batch_parallel, update_single, Atmosphere, DispersionScheme,
    EmissionModel, GridGeometry, GridSummary, GridView, KernelConfig, KernelError, PointSource,
    VehicleSource, Window,
};

use crate::error::{DefaultPlumeError, PlumeErrorCode};
use crate::helpers::{stability_from_ptr, track_error, track_result};

/// C-compatible grid geometry: world bounds and cells per axis.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlumeGridGeometry {
    /// Western bound (world units)
    pub x_min: f64,
    /// Eastern bound (world units)
    pub x_max: f64,
    /// Southern bound (world units)
    pub y_min: f64,
    /// Northern bound (world units)
    pub y_max: f64,
    /// Cells per axis; the grid must be `resolution × resolution`
    pub resolution: usize,
}

impl From<PlumeGridGeometry> for GridGeometry {
    fn from(g: PlumeGridGeometry) -> Self {
        GridGeometry {
            x_min: g.x_min,
            x_max: g.x_max,
            y_min: g.y_min,
            y_max: g.y_max,
            resolution: g.resolution,
        }
    }
}

/// C-compatible half-open index window `[row_min, row_max) × [col_min, col_max)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlumeWindow {
    /// First row visited
    pub row_min: usize,
    /// One past the last row visited
    pub row_max: usize,
    /// First column visited
    pub col_min: usize,
    /// One past the last column visited
    pub col_max: usize,
}

impl From<PlumeWindow> for Window {
    fn from(w: PlumeWindow) -> Self {
        Window::new(w.row_min, w.row_max, w.col_min, w.col_max)
    }
}

impl From<Window> for PlumeWindow {
    fn from(w: Window) -> Self {
        PlumeWindow {
            row_min: w.row_min,
            row_max: w.row_max,
            col_min: w.col_min,
            col_max: w.col_max,
        }
    }
}

/// C-compatible vehicle record for batch updates.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlumeVehicle {
    /// X position (world units)
    pub x: f64,
    /// Y position (world units)
    pub y: f64,
    /// Speed (m/s, non-negative)
    pub speed: f64,
}

/// Coefficient table selector for [`PlumeKernelConfig`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlumeDispersionScheme {
    /// Per-class stability table
    ClassDependent = 0,
    /// Neutral coefficients for every class (historical single-source output)
    FixedNeutral = 1,
    /// Per-class table with class D at 0.08/0.06 (historical multi-vehicle output)
    HistoricalTable = 2,
}

impl From<DispersionScheme> for PlumeDispersionScheme {
    fn from(scheme: DispersionScheme) -> Self {
        match scheme {
            DispersionScheme::ClassDependent => PlumeDispersionScheme::ClassDependent,
            DispersionScheme::FixedNeutral => PlumeDispersionScheme::FixedNeutral,
            DispersionScheme::HistoricalTable => PlumeDispersionScheme::HistoricalTable,
        }
    }
}

impl From<PlumeDispersionScheme> for DispersionScheme {
    fn from(scheme: PlumeDispersionScheme) -> Self {
        match scheme {
            PlumeDispersionScheme::ClassDependent => DispersionScheme::ClassDependent,
            PlumeDispersionScheme::FixedNeutral => DispersionScheme::FixedNeutral,
            PlumeDispersionScheme::HistoricalTable => DispersionScheme::HistoricalTable,
        }
    }
}

/// C-compatible kernel configuration.
///
/// Obtain defaults from `plume_default_config()` and override fields as needed.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlumeKernelConfig {
    /// Half-side of the window visited around each vehicle (m)
    pub influence_radius: f64,
    /// Receptors closer than this are skipped (m)
    pub near_cutoff: f64,
    /// Receptors farther than this are skipped (m)
    pub far_cutoff: f64,
    /// Fraction of the grid kept at the start of each batch
    pub retention_factor: f64,
    /// Coefficient table used for the dispersion spread
    pub scheme: PlumeDispersionScheme,
    /// Emission of a single vehicle before scaling
    pub base_emission: f64,
    /// Speed above which emissions grow (m/s)
    pub speed_threshold: f64,
    /// Emission growth per m/s above the threshold
    pub speed_slope: f64,
    /// Lowest plume height (m)
    pub min_plume_height: f64,
    /// Plume height growth per m/s
    pub plume_slope: f64,
    /// Plume height offset (m)
    pub plume_offset: f64,
}

impl From<KernelConfig> for PlumeKernelConfig {
    fn from(c: KernelConfig) -> Self {
        PlumeKernelConfig {
            influence_radius: c.influence_radius,
            near_cutoff: c.near_cutoff,
            far_cutoff: c.far_cutoff,
            retention_factor: c.retention_factor,
            scheme: c.scheme.into(),
            base_emission: c.emission.base_emission,
            speed_threshold: c.emission.speed_threshold,
            speed_slope: c.emission.speed_slope,
            min_plume_height: c.emission.min_plume_height,
            plume_slope: c.emission.plume_slope,
            plume_offset: c.emission.plume_offset,
        }
    }
}

impl From<&PlumeKernelConfig> for KernelConfig {
    fn from(c: &PlumeKernelConfig) -> Self {
        KernelConfig {
            influence_radius: c.influence_radius,
            near_cutoff: c.near_cutoff,
            far_cutoff: c.far_cutoff,
            retention_factor: c.retention_factor,
            scheme: c.scheme.into(),
            emission: EmissionModel {
                base_emission: c.base_emission,
                speed_threshold: c.speed_threshold,
                speed_slope: c.speed_slope,
                min_plume_height: c.min_plume_height,
                plume_slope: c.plume_slope,
                plume_offset: c.plume_offset,
            },
        }
    }
}

/// C-compatible grid statistics.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlumeGridSummary {
    /// Largest cell value
    pub max: f64,
    /// Mean over all cells
    pub mean: f64,
    /// Sum over all cells
    pub total: f64,
    /// Cells holding a non-zero value
    pub nonzero_cells: usize,
}

impl From<GridSummary> for PlumeGridSummary {
    fn from(s: GridSummary) -> Self {
        PlumeGridSummary {
            max: s.max,
            mean: s.mean,
            total: s.total,
            nonzero_cells: s.nonzero_cells,
        }
    }
}

/// Null config means defaults.
unsafe fn config_from_ptr(config: *const PlumeKernelConfig) -> KernelConfig {
    config.as_ref().map_or_else(KernelConfig::default, KernelConfig::from)
}

/// Borrow the host grid, checking the pointer and that `rows * cols` fits.
unsafe fn grid_from_ptr<'a>(
    grid: *mut f64,
    rows: usize,
    cols: usize,
) -> Result<GridView<'a>, PlumeErrorCode> {
    if grid.is_null() {
        return Err(track_error(&DefaultPlumeError::null_pointer("grid")));
    }
    let len = rows
        .checked_mul(cols)
        .ok_or_else(|| track_error(&DefaultPlumeError::grid_too_large(rows, cols)))?;
    let data = slice::from_raw_parts_mut(grid, len);
    GridView::new(data, rows, cols).map_err(|err| track_error(&DefaultPlumeError::from(&err)))
}

/// Returns the default kernel configuration.
///
/// Radius 100, near cutoff 1, far cutoff 300, retention 0.99, class-dependent
/// coefficients and the default vehicle emission model.
#[no_mangle]
pub extern "C" fn plume_default_config() -> PlumeKernelConfig {
    PlumeKernelConfig::from(KernelConfig::default())
}

/// Adds the plume of one point source to the cells of `window`.
///
/// # Arguments
/// * `grid` - Row-major `rows * cols` concentration buffer (must not be null)
/// * `rows`, `cols` - Grid dimensions; both must equal `geometry.resolution`
/// * `geometry` - World bounds of the grid
/// * `window` - Cells to visit; must lie inside the grid
/// * `x`, `y` - Source position
/// * `emission_rate` - Source strength (non-negative)
/// * `plume_height` - Effective release height
/// * `wind_speed` - Wind speed (m/s, positive)
/// * `wind_direction` - Radians counter-clockwise from +x, towards which the wind blows
/// * `stability_class` - Label `"A"`..`"F"`; null or unknown means `"D"`
/// * `config` - Kernel configuration; null means defaults
///
/// # Returns
/// `PlumeErrorCode::Ok` on success. On any error the grid is unchanged and the
/// message is available from `plume_get_last_error()`.
///
/// # Safety
/// - `grid` must point to `rows * cols` writable, initialized `f64` values not
///   aliased for the duration of the call.
/// - `stability_class` must be null or a valid null-terminated C string.
/// - `config` must be null or point to a valid `PlumeKernelConfig`.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn plume_update_single(
    grid: *mut f64,
    rows: usize,
    cols: usize,
    geometry: PlumeGridGeometry,
    window: PlumeWindow,
    x: f64,
    y: f64,
    emission_rate: f64,
    plume_height: f64,
    wind_speed: f64,
    wind_direction: f64,
    stability_class: *const c_char,
    config: *const PlumeKernelConfig,
) -> PlumeErrorCode {
    let mut view = match grid_from_ptr(grid, rows, cols) {
        Ok(view) => view,
        Err(code) => return code,
    };
    let config = config_from_ptr(config);
    let stability = stability_from_ptr(stability_class);

    let result = Atmosphere::new(wind_speed, wind_direction, stability).and_then(|atmosphere| {
        update_single(
            &mut view,
            window.into(),
            &PointSource::new(x, y, emission_rate, plume_height),
            &atmosphere,
            &geometry.into(),
            &config,
        )
    });
    track_result(result)
}

type BatchUpdater = fn(
    &mut GridView<'_>,
    &[VehicleSource],
    &Atmosphere,
    f64,
    &GridGeometry,
    &KernelConfig,
) -> Result<(), KernelError>;

#[allow(clippy::too_many_arguments)]
unsafe fn run_batch(
    updater: BatchUpdater,
    grid: *mut f64,
    rows: usize,
    cols: usize,
    geometry: PlumeGridGeometry,
    vehicles: *const PlumeVehicle,
    vehicle_count: usize,
    wind_speed: f64,
    wind_direction: f64,
    emission_factor: f64,
    stability_class: *const c_char,
    config: *const PlumeKernelConfig,
) -> PlumeErrorCode {
    let mut view = match grid_from_ptr(grid, rows, cols) {
        Ok(view) => view,
        Err(code) => return code,
    };
    let vehicles: &[PlumeVehicle] = if vehicle_count == 0 {
        &[]
    } else if vehicles.is_null() {
        return track_error(&DefaultPlumeError::null_pointer("vehicles"));
    } else {
        slice::from_raw_parts(vehicles, vehicle_count)
    };
    let sources: Vec<VehicleSource> = vehicles
        .iter()
        .map(|v| VehicleSource::new(v.x, v.y, v.speed))
        .collect();
    let config = config_from_ptr(config);
    let stability = stability_from_ptr(stability_class);

    let result = Atmosphere::new(wind_speed, wind_direction, stability).and_then(|atmosphere| {
        updater(
            &mut view,
            &sources,
            &atmosphere,
            emission_factor,
            &geometry.into(),
            &config,
        )
    });
    track_result(result)
}

/// Runs one simulation tick: decays every cell by the retention factor, then
/// adds the plume of each vehicle within the influence radius around it.
///
/// Sources are accumulated in order on the calling thread, so results are
/// bit-for-bit reproducible.
///
/// # Arguments
/// * `grid` - Row-major `rows * cols` concentration buffer (must not be null)
/// * `rows`, `cols` - Grid dimensions; both must equal `geometry.resolution`
/// * `geometry` - World bounds of the grid
/// * `vehicles` - Array of `vehicle_count` vehicles; may be null only when the count is 0
/// * `vehicle_count` - Number of vehicles
/// * `wind_speed` - Wind speed (m/s, positive)
/// * `wind_direction` - Radians counter-clockwise from +x, towards which the wind blows
/// * `emission_factor` - Global multiplier on vehicle emissions (non-negative)
/// * `stability_class` - Label `"A"`..`"F"`; null or unknown means `"D"`
/// * `config` - Kernel configuration; null means defaults
///
/// # Returns
/// `PlumeErrorCode::Ok` on success. Every input is validated before the grid
/// is touched, so on error the grid (including the decay) is unchanged.
///
/// # Safety
/// - `grid` must point to `rows * cols` writable, initialized `f64` values not
///   aliased for the duration of the call.
/// - `vehicles` must be null or point to `vehicle_count` valid `PlumeVehicle` records.
/// - `stability_class` must be null or a valid null-terminated C string.
/// - `config` must be null or point to a valid `PlumeKernelConfig`.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn plume_update_batch(
    grid: *mut f64,
    rows: usize,
    cols: usize,
    geometry: PlumeGridGeometry,
    vehicles: *const PlumeVehicle,
    vehicle_count: usize,
    wind_speed: f64,
    wind_direction: f64,
    emission_factor: f64,
    stability_class: *const c_char,
    config: *const PlumeKernelConfig,
) -> PlumeErrorCode {
    run_batch(
        update_batch,
        grid,
        rows,
        cols,
        geometry,
        vehicles,
        vehicle_count,
        wind_speed,
        wind_direction,
        emission_factor,
        stability_class,
        config,
    )
}

/// Same as `plume_update_batch()`, with vehicles accumulated on a worker pool.
///
/// Each worker sums into a private scratch grid which are then reduced, so the
/// result matches `plume_update_batch()` up to floating-point reassociation.
/// Prefer it for large fleets on large grids.
///
/// # Safety
/// Same requirements as `plume_update_batch()`.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn plume_update_batch_parallel(
    grid: *mut f64,
    rows: usize,
    cols: usize,
    geometry: PlumeGridGeometry,
    vehicles: *const PlumeVehicle,
    vehicle_count: usize,
    wind_speed: f64,
    wind_direction: f64,
    emission_factor: f64,
    stability_class: *const c_char,
    config: *const PlumeKernelConfig,
) -> PlumeErrorCode {
    run_batch(
        update_batch_parallel,
        grid,
        rows,
        cols,
        geometry,
        vehicles,
        vehicle_count,
        wind_speed,
        wind_direction,
        emission_factor,
        stability_class,
        config,
    )
}

/// Computes the window of half-side `radius` around `(x, y)`, clamped to the grid.
///
/// Sources far outside the domain produce an empty window, not an error.
///
/// # Arguments
/// * `geometry` - World bounds of the grid
/// * `x`, `y` - Source position
/// * `radius` - Half-side of the window (world units); pass a negative value
///   to use the default influence radius
/// * `out_window` - Receives the window (must not be null)
///
/// # Safety
/// `out_window` must be null or point to writable memory for a `PlumeWindow`.
#[no_mangle]
pub unsafe extern "C" fn plume_compute_window(
    geometry: PlumeGridGeometry,
    x: f64,
    y: f64,
    radius: f64,
    out_window: *mut PlumeWindow,
) -> PlumeErrorCode {
    let Some(out) = out_window.as_mut() else {
        return track_error(&DefaultPlumeError::null_pointer("out_window"));
    };
    let geometry = GridGeometry::from(geometry);
    if let Err(err) = geometry.validate() {
        return track_error(&DefaultPlumeError::from(&err));
    }
    let radius = if radius < 0.0 {
        constants::INFLUENCE_RADIUS
    } else {
        radius
    };
    let res = geometry.resolution;
    *out = Window::around(x, y, radius, &geometry, res, res).into();
    track_result(Ok(()))
}

/// Emission rate of a vehicle at `speed` scaled by `emission_factor`.
///
/// # Safety
/// `config` must be null (defaults) or point to a valid `PlumeKernelConfig`.
#[no_mangle]
pub unsafe extern "C" fn plume_emission_rate(
    speed: f64,
    emission_factor: f64,
    config: *const PlumeKernelConfig,
) -> f64 {
    config_from_ptr(config)
        .emission
        .emission_rate(speed, emission_factor)
}

/// Plume height of a vehicle at `speed`.
///
/// # Safety
/// `config` must be null (defaults) or point to a valid `PlumeKernelConfig`.
#[no_mangle]
pub unsafe extern "C" fn plume_plume_height(speed: f64, config: *const PlumeKernelConfig) -> f64 {
    config_from_ptr(config).emission.plume_height(speed)
}

/// Summarizes a grid (max, mean, total, non-zero cells) for colour scaling.
///
/// # Safety
/// - `grid` must point to `len` readable `f64` values.
/// - `out_summary` must point to writable memory for a `PlumeGridSummary`.
#[no_mangle]
pub unsafe extern "C" fn plume_grid_summary(
    grid: *const f64,
    len: usize,
    out_summary: *mut PlumeGridSummary,
) -> PlumeErrorCode {
    if grid.is_null() {
        return track_error(&DefaultPlumeError::null_pointer("grid"));
    }
    let Some(out) = out_summary.as_mut() else {
        return track_error(&DefaultPlumeError::null_pointer("out_summary"));
    };
    *out = GridSummary::from_cells(slice::from_raw_parts(grid, len)).into();
    track_result(Ok(()))
}
