//! Atmospheric state shared by every source in an update call
//!
//! Wind direction follows the mathematical convention used by the grid:
//! radians measured counter-clockwise from the +x axis, pointing to where the
//! wind blows towards. A plume with direction 0 travels along +x.

use crate::error::KernelError;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use tracing::warn;

/// Pasquill-Gifford atmospheric stability classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StabilityClass {
    /// A: Very unstable (strong solar heating, light winds)
    A,
    /// B: Moderately unstable
    B,
    /// C: Slightly unstable
    C,
    /// D: Neutral (overcast or high winds)
    #[default]
    D,
    /// E: Slightly stable
    E,
    /// F: Very stable (nighttime, light winds)
    F,
}

impl StabilityClass {
    /// All classes from most to least unstable
    pub const ALL: [StabilityClass; 6] = [
        StabilityClass::A,
        StabilityClass::B,
        StabilityClass::C,
        StabilityClass::D,
        StabilityClass::E,
        StabilityClass::F,
    ];

    /// Parse a class label, returning `None` for anything unrecognized.
    ///
    /// Surrounding whitespace is ignored and lowercase letters are accepted,
    /// so `"a"` and `"A "` both resolve to [`StabilityClass::A`].
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "A" | "a" => Some(StabilityClass::A),
            "B" | "b" => Some(StabilityClass::B),
            "C" | "c" => Some(StabilityClass::C),
            "D" | "d" => Some(StabilityClass::D),
            "E" | "e" => Some(StabilityClass::E),
            "F" | "f" => Some(StabilityClass::F),
            _ => None,
        }
    }

    /// Resolve a class label, falling back to neutral D for unknown labels
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_else(|| {
            warn!("Unrecognized stability class {:?}, using neutral class D", label);
            StabilityClass::D
        })
    }

    /// Single-letter label of the class
    pub const fn label(&self) -> &'static str {
        match self {
            StabilityClass::A => "A",
            StabilityClass::B => "B",
            StabilityClass::C => "C",
            StabilityClass::D => "D",
            StabilityClass::E => "E",
            StabilityClass::F => "F",
        }
    }
}

impl fmt::Display for StabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Wind and stability for one update call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    wind_speed: f64,
    wind_direction: f64,
    stability: StabilityClass,
}

impl Atmosphere {
    /// Create a validated atmosphere.
    ///
    /// # Arguments
    ///
    /// * `wind_speed` - Wind speed (m/s), must be finite and > 0
    /// * `wind_direction` - Direction the wind blows towards (radians, any finite value)
    /// * `stability` - Stability class
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::InvalidWindSpeed`] for zero, negative or non-finite speed
    /// and [`KernelError::InvalidWindDirection`] for a non-finite direction.
    pub fn new(
        wind_speed: f64,
        wind_direction: f64,
        stability: StabilityClass,
    ) -> Result<Self, KernelError> {
        if !wind_speed.is_finite() || wind_speed <= 0.0 {
            return Err(KernelError::InvalidWindSpeed(wind_speed));
        }
        if !wind_direction.is_finite() {
            return Err(KernelError::InvalidWindDirection(wind_direction));
        }

        Ok(Self {
            wind_speed,
            wind_direction: normalize_angle(wind_direction),
            stability,
        })
    }

    /// Create an atmosphere from a direction given in degrees
    ///
    /// # Errors
    ///
    /// Same as [`Atmosphere::new`].
    pub fn from_degrees(
        wind_speed: f64,
        wind_direction_deg: f64,
        stability: StabilityClass,
    ) -> Result<Self, KernelError> {
        Self::new(wind_speed, wind_direction_deg.to_radians(), stability)
    }

    /// Wind speed (m/s)
    pub fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    /// Wind direction reduced to `[0, 2π)`
    pub fn wind_direction(&self) -> f64 {
        self.wind_direction
    }

    /// Stability class
    pub fn stability(&self) -> StabilityClass {
        self.stability
    }
}

/// Reduce an angle to `[0, 2π)`
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let reduced = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if reduced >= TAU {
        0.0
    } else {
        reduced
    }
}
