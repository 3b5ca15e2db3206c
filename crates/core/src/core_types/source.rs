//! Emission sources and the per-source parameters derived from them

use crate::error::KernelError;
use serde::{Deserialize, Serialize};

/// A moving vehicle as reported by the host for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleSource {
    /// X position in world coordinates
    pub x: f64,
    /// Y position in world coordinates
    pub y: f64,
    /// Speed (m/s)
    pub speed: f64,
}

impl VehicleSource {
    /// Create a vehicle source
    pub const fn new(x: f64, y: f64, speed: f64) -> Self {
        Self { x, y, speed }
    }

    /// Check that the entry at `index` of a batch is usable
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::MalformedSource`] for a non-finite position or a
    /// non-finite or negative speed.
    pub fn validate(&self, index: usize) -> Result<(), KernelError> {
        let reason = if !self.x.is_finite() {
            format!("x is {}", self.x)
        } else if !self.y.is_finite() {
            format!("y is {}", self.y)
        } else if !self.speed.is_finite() || self.speed < 0.0 {
            format!("speed must be finite and non-negative, got {}", self.speed)
        } else {
            return Ok(());
        };

        Err(KernelError::MalformedSource { index, reason })
    }
}

impl From<(f64, f64, f64)> for VehicleSource {
    fn from((x, y, speed): (f64, f64, f64)) -> Self {
        Self::new(x, y, speed)
    }
}

/// A point source with its emission parameters already resolved
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointSource {
    /// X position in world coordinates
    pub x: f64,
    /// Y position in world coordinates
    pub y: f64,
    /// Emission rate (mass per unit time)
    pub emission_rate: f64,
    /// Effective plume height above ground
    pub plume_height: f64,
}

impl PointSource {
    /// Create a point source
    pub const fn new(x: f64, y: f64, emission_rate: f64, plume_height: f64) -> Self {
        Self {
            x,
            y,
            emission_rate,
            plume_height,
        }
    }

    /// Check every field is finite and the emission rate is non-negative
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> Result<(), KernelError> {
        let checks = [
            ("x", self.x, self.x.is_finite()),
            ("y", self.y, self.y.is_finite()),
            (
                "emission_rate",
                self.emission_rate,
                self.emission_rate.is_finite() && self.emission_rate >= 0.0,
            ),
            ("plume_height", self.plume_height, self.plume_height.is_finite()),
        ];

        match checks.iter().find(|(_, _, ok)| !ok) {
            Some(&(name, value, _)) => Err(KernelError::InvalidParameter { name, value }),
            None => Ok(()),
        }
    }
}

/// Speed-dependent emission rate and plume rise for road vehicles
///
/// ```text
/// Q = base · f(v) · F        f(v) = 1                      if v ≤ v₀
///                                   1 + slope · (v − v₀)   otherwise
/// H = max(H_min, a · v + b)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionModel {
    /// Emission of a single vehicle before speed and global scaling
    pub base_emission: f64,
    /// Speed above which emissions grow linearly (m/s)
    pub speed_threshold: f64,
    /// Emission growth per m/s above the threshold
    pub speed_slope: f64,
    /// Lowest plume height (m)
    pub min_plume_height: f64,
    /// Plume height growth per m/s of vehicle speed
    pub plume_slope: f64,
    /// Plume height at zero speed before the floor is applied (m)
    pub plume_offset: f64,
}

impl Default for EmissionModel {
    fn default() -> Self {
        Self {
            base_emission: 0.1,
            speed_threshold: 20.0,
            speed_slope: 0.05,
            min_plume_height: 2.0,
            plume_slope: 0.15,
            plume_offset: 0.5,
        }
    }
}

impl EmissionModel {
    /// Multiplier applied to the base emission at `speed`
    #[inline]
    pub fn speed_factor(&self, speed: f64) -> f64 {
        if speed > self.speed_threshold {
            1.0 + self.speed_slope * (speed - self.speed_threshold)
        } else {
            1.0
        }
    }

    /// Emission rate for a vehicle at `speed` scaled by the global `emission_factor`
    #[inline]
    pub fn emission_rate(&self, speed: f64, emission_factor: f64) -> f64 {
        self.base_emission * self.speed_factor(speed) * emission_factor
    }

    /// Plume height for a vehicle at `speed`
    #[inline]
    pub fn plume_height(&self, speed: f64) -> f64 {
        (self.plume_slope * speed + self.plume_offset).max(self.min_plume_height)
    }

    /// Resolve a vehicle into a point source
    pub fn point_source(&self, vehicle: &VehicleSource, emission_factor: f64) -> PointSource {
        PointSource::new(
            vehicle.x,
            vehicle.y,
            self.emission_rate(vehicle.speed, emission_factor),
            self.plume_height(vehicle.speed),
        )
    }

    /// Check the model constants
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::InvalidConfig`] if any constant is non-finite or negative.
    pub fn validate(&self) -> Result<(), KernelError> {
        let fields = [
            ("base_emission", self.base_emission),
            ("speed_threshold", self.speed_threshold),
            ("speed_slope", self.speed_slope),
            ("min_plume_height", self.min_plume_height),
            ("plume_slope", self.plume_slope),
            ("plume_offset", self.plume_offset),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(KernelError::InvalidConfig(format!(
                    "emission model {name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
