//! Horizontal and vertical dispersion coefficients
//!
//! Briggs-style open-country fit used by the traffic model:
//!
//! ```text
//! σ_y = a · x · (1 + k·x)^(-1/2)
//! σ_z = b · x · (1 + k·x)^(-1/2)        k = 1e-4
//! ```
//!
//! | class | a    | b     |
//! |-------|------|-------|
//! | A     | 0.22 | 0.20  |
//! | B     | 0.16 | 0.12  |
//! | C     | 0.11 | 0.08  |
//! | D     | 0.10 | 0.05  |
//! | E     | 0.06 | 0.03  |
//! | F     | 0.04 | 0.016 |
//!
//! The historical batch table differs only in class D, which it sets to
//! `(0.08, 0.06)`; see [`DispersionScheme::HistoricalTable`].
//!
//! Both sigmas grow strictly with distance for x > 0 because
//! `d/dx [x (1 + kx)^(-1/2)] = (1 + kx/2)(1 + kx)^(-3/2) > 0`.

use crate::core_types::StabilityClass;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Distance damping constant of the sigma fit (1/m)
pub const DISTANCE_DAMPING: f64 = 1e-4;

/// Coefficients used by [`DispersionScheme::FixedNeutral`]
pub const NEUTRAL_COEFFICIENTS: (f64, f64) = (0.10, 0.05);

/// Class D entry of [`DispersionScheme::HistoricalTable`]
pub const HISTORICAL_D_COEFFICIENTS: (f64, f64) = (0.08, 0.06);

/// Which coefficient table the kernel evaluates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DispersionScheme {
    /// Per-class `(a, b)` from the stability table
    #[default]
    ClassDependent,
    /// Neutral `(0.10, 0.05)` for every class, matching the historical
    /// single-source update output
    FixedNeutral,
    /// Per-class table with D at `(0.08, 0.06)`, matching the historical
    /// multi-vehicle update output for explicitly labelled classes
    HistoricalTable,
}

impl DispersionScheme {
    /// `(a, b)` linear coefficients for a stability class under this scheme
    #[inline]
    pub const fn parameters(&self, class: StabilityClass) -> (f64, f64) {
        match self {
            DispersionScheme::ClassDependent => class_parameters(class),
            DispersionScheme::FixedNeutral => NEUTRAL_COEFFICIENTS,
            DispersionScheme::HistoricalTable => match class {
                StabilityClass::D => HISTORICAL_D_COEFFICIENTS,
                _ => class_parameters(class),
            },
        }
    }

    /// Log a `debug!` event on each update that runs under a historical variant
    pub(crate) fn announce(&self) {
        match self {
            DispersionScheme::ClassDependent => {}
            DispersionScheme::FixedNeutral => {
                debug!("Using fixed neutral dispersion coefficients (stability class ignored)");
            }
            DispersionScheme::HistoricalTable => {
                debug!("Using historical coefficient table (class D at 0.08/0.06)");
            }
        }
    }
}

/// Dispersion spread at one downwind distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sigmas {
    /// Horizontal (crosswind) spread
    pub sigma_y: f64,
    /// Vertical spread
    pub sigma_z: f64,
}

/// `(a, b)` linear coefficients of a stability class
#[inline]
pub const fn class_parameters(class: StabilityClass) -> (f64, f64) {
    match class {
        StabilityClass::A => (0.22, 0.20),
        StabilityClass::B => (0.16, 0.12),
        StabilityClass::C => (0.11, 0.08),
        StabilityClass::D => (0.10, 0.05),
        StabilityClass::E => (0.06, 0.03),
        StabilityClass::F => (0.04, 0.016),
    }
}

/// Evaluate `(σ_y, σ_z)` for linear coefficients `(a, b)` at `distance`
#[inline(always)]
pub fn sigmas_from_parameters((a, b): (f64, f64), distance: f64) -> Sigmas {
    let scaled = distance / (1.0 + DISTANCE_DAMPING * distance).sqrt();
    Sigmas {
        sigma_y: a * scaled,
        sigma_z: b * scaled,
    }
}

/// Dispersion coefficients for a stability class at `distance ≥ 0`
///
/// Returns zero sigmas at distance 0; callers exclude that point through the
/// near-field cutoff before dividing by them.
#[inline]
pub fn coefficients(class: StabilityClass, distance: f64) -> Sigmas {
    sigmas_from_parameters(class_parameters(class), distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_table_values() {
        assert_eq!(class_parameters(StabilityClass::A), (0.22, 0.20));
        assert_eq!(class_parameters(StabilityClass::D), (0.10, 0.05));
        assert_eq!(class_parameters(StabilityClass::F), (0.04, 0.016));
    }

    #[test]
    fn test_formula_at_100m() {
        let s = coefficients(StabilityClass::D, 100.0);
        let damping = (1.0_f64 + 0.01).powf(-0.5);
        assert_relative_eq!(s.sigma_y, 0.10 * 100.0 * damping, epsilon = 1e-12);
        assert_relative_eq!(s.sigma_z, 0.05 * 100.0 * damping, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_distance() {
        for class in StabilityClass::ALL {
            let s = coefficients(class, 0.0);
            assert_eq!(s.sigma_y, 0.0);
            assert_eq!(s.sigma_z, 0.0);
        }
    }

    #[test]
    fn test_monotonic_in_distance() {
        for class in StabilityClass::ALL {
            let mut previous = coefficients(class, 0.0);
            let mut distance = 0.5;
            while distance < 50_000.0 {
                let current = coefficients(class, distance);
                assert!(current.sigma_y > previous.sigma_y, "{class} at {distance}");
                assert!(current.sigma_z > previous.sigma_z, "{class} at {distance}");
                assert!(current.sigma_y > 0.0 && current.sigma_z > 0.0);
                previous = current;
                distance *= 1.5;
            }
        }
    }

    #[test]
    fn test_unstable_classes_spread_more() {
        let distance = 250.0;
        let spreads: Vec<Sigmas> = StabilityClass::ALL
            .iter()
            .map(|&c| coefficients(c, distance))
            .collect();
        for pair in spreads.windows(2) {
            assert!(pair[0].sigma_y > pair[1].sigma_y);
            assert!(pair[0].sigma_z > pair[1].sigma_z);
        }
    }

    #[test]
    fn test_fixed_neutral_ignores_class() {
        let scheme = DispersionScheme::FixedNeutral;
        for class in StabilityClass::ALL {
            assert_eq!(scheme.parameters(class), NEUTRAL_COEFFICIENTS);
        }
        assert_eq!(
            DispersionScheme::ClassDependent.parameters(StabilityClass::B),
            (0.16, 0.12)
        );
    }

    #[test]
    fn test_historical_table_differs_only_in_class_d() {
        let scheme = DispersionScheme::HistoricalTable;
        assert_eq!(scheme.parameters(StabilityClass::D), (0.08, 0.06));
        for class in StabilityClass::ALL {
            if class != StabilityClass::D {
                assert_eq!(scheme.parameters(class), class_parameters(class));
            }
        }

        let s = sigmas_from_parameters(scheme.parameters(StabilityClass::D), 100.0);
        let damping = (1.0_f64 + 0.01).powf(-0.5);
        assert_relative_eq!(s.sigma_y, 0.08 * 100.0 * damping, epsilon = 1e-12);
        assert_relative_eq!(s.sigma_z, 0.06 * 100.0 * damping, epsilon = 1e-12);
    }
}
