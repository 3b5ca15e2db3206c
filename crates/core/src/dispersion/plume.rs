//! Steady-state Gaussian plume contribution at one receptor
//!
//! Evaluated in polar form around the source:
//!
//! ```text
//!        Q           ⎛   Δθ² ⎞       ⎛   H²  ⎞      1
//! C = ────────  · exp⎜− ─────⎟ · 2exp⎜− ─────⎟ · ─────────
//!      2π · u        ⎝  2σ_y²⎠       ⎝  2σ_z²⎠   σ_y · σ_z
//! ```
//!
//! `Δθ` is the shortest angle between the wind direction and the bearing from
//! source to receptor. The factor 2 on the vertical term is the ground
//! reflection (image source) for zero flux through the surface.

use std::f64::consts::{PI, TAU};

/// Shortest angular distance between two bearings, in `[0, π]`
#[inline(always)]
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(TAU);
    if diff > PI {
        TAU - diff
    } else {
        diff
    }
}

/// Crosswind (lateral) Gaussian factor
#[inline(always)]
pub fn lateral_factor(angle_diff: f64, sigma_y: f64) -> f64 {
    let ratio = angle_diff / sigma_y;
    (-0.5 * ratio * ratio).exp()
}

/// Vertical Gaussian factor including the ground-reflected image source
#[inline(always)]
pub fn vertical_factor(plume_height: f64, sigma_z: f64) -> f64 {
    let ratio = plume_height / sigma_z;
    2.0 * (-0.5 * ratio * ratio).exp()
}

/// Concentration increment at a receptor offset `(dx, dy)` from the source
///
/// # Arguments
///
/// * `dx`, `dy` - Receptor position minus source position
/// * `wind_direction` - Direction the wind blows towards (radians)
/// * `sigma_y`, `sigma_z` - Dispersion coefficients at this distance (> 0)
/// * `plume_height` - Effective release height
/// * `emission_rate` - Source strength
/// * `wind_speed` - Wind speed (> 0)
///
/// # Returns
///
/// Non-negative concentration increment
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn contribution(
    dx: f64,
    dy: f64,
    wind_direction: f64,
    sigma_y: f64,
    sigma_z: f64,
    plume_height: f64,
    emission_rate: f64,
    wind_speed: f64,
) -> f64 {
    let strength = emission_rate / (TAU * wind_speed);
    weighted_contribution(dx, dy, wind_direction, sigma_y, sigma_z, plume_height, strength)
}

/// [`contribution`] with `Q / (2π·u)` already folded into `strength`
///
/// The grid updaters hoist the strength out of their cell loops.
#[inline(always)]
pub(crate) fn weighted_contribution(
    dx: f64,
    dy: f64,
    wind_direction: f64,
    sigma_y: f64,
    sigma_z: f64,
    plume_height: f64,
    strength: f64,
) -> f64 {
    let angle_diff = angular_distance(dy.atan2(dx), wind_direction);
    strength * lateral_factor(angle_diff, sigma_y) * vertical_factor(plume_height, sigma_z)
        / (sigma_y * sigma_z)
}
