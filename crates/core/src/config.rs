//! Tunable kernel parameters and host-facing scenario settings
//!
//! The cutoffs, retention factor and influence radius default to the values the
//! traffic model was calibrated with, but are plain configuration so hosts can
//! experiment with them.

use crate::core_types::{Atmosphere, EmissionModel, StabilityClass};
use crate::dispersion::DispersionScheme;
use crate::error::KernelError;
use serde::{Deserialize, Serialize};

/// Default values of [`KernelConfig`]
pub mod constants {
    /// Half-side of the square window visited around each source (m)
    pub const INFLUENCE_RADIUS: f64 = 100.0;

    /// Receptors closer than this are skipped (m)
    pub const NEAR_FIELD_CUTOFF: f64 = 1.0;

    /// Receptors farther than this are skipped regardless of the window (m)
    pub const FAR_FIELD_CUTOFF: f64 = 300.0;

    /// Fraction of the accumulated concentration kept per batch update
    pub const RETENTION_FACTOR: f64 = 0.99;

    /// Upper bound of a plausible surface wind for scenario settings (m/s)
    pub const MAX_SCENARIO_WIND_SPEED: f64 = 30.0;

    /// Accepted grid resolution range for scenario settings
    pub const SCENARIO_RESOLUTION_RANGE: (usize, usize) = (10, 1000);
}

/// Parameters of the dispersion kernel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Half-side of the window visited around each source (m)
    pub influence_radius: f64,
    /// Minimum receptor distance (m)
    pub near_cutoff: f64,
    /// Maximum receptor distance (m)
    pub far_cutoff: f64,
    /// Multiplier applied to every cell at the start of a batch update
    pub retention_factor: f64,
    /// Coefficient table
    pub scheme: DispersionScheme,
    /// Emission rate and plume rise of vehicles
    pub emission: EmissionModel,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            influence_radius: constants::INFLUENCE_RADIUS,
            near_cutoff: constants::NEAR_FIELD_CUTOFF,
            far_cutoff: constants::FAR_FIELD_CUTOFF,
            retention_factor: constants::RETENTION_FACTOR,
            scheme: DispersionScheme::default(),
            emission: EmissionModel::default(),
        }
    }
}

impl KernelConfig {
    /// Configuration reproducing the historical single-source output
    pub fn fixed_neutral() -> Self {
        Self {
            scheme: DispersionScheme::FixedNeutral,
            ..Self::default()
        }
    }

    /// Configuration reproducing the historical multi-vehicle coefficient table
    pub fn historical_table() -> Self {
        Self {
            scheme: DispersionScheme::HistoricalTable,
            ..Self::default()
        }
    }

    /// Check every parameter is usable
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<(), KernelError> {
        if !self.influence_radius.is_finite() || self.influence_radius <= 0.0 {
            return Err(KernelError::InvalidConfig(format!(
                "influence_radius must be finite and positive, got {}",
                self.influence_radius
            )));
        }
        if !self.near_cutoff.is_finite() || self.near_cutoff <= 0.0 {
            return Err(KernelError::InvalidConfig(format!(
                "near_cutoff must be finite and positive, got {}",
                self.near_cutoff
            )));
        }
        if !self.far_cutoff.is_finite() || self.far_cutoff <= self.near_cutoff {
            return Err(KernelError::InvalidConfig(format!(
                "far_cutoff ({}) must be finite and exceed near_cutoff ({})",
                self.far_cutoff, self.near_cutoff
            )));
        }
        if !self.retention_factor.is_finite()
            || self.retention_factor <= 0.0
            || self.retention_factor > 1.0
        {
            return Err(KernelError::InvalidConfig(format!(
                "retention_factor must lie in (0, 1], got {}",
                self.retention_factor
            )));
        }
        self.emission.validate()
    }
}

/// Scenario parameters as a host UI or config file expresses them
///
/// Wind direction is in degrees here; [`ScenarioSettings::atmosphere`] converts
/// it once at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSettings {
    /// Wind speed (m/s)
    pub wind_speed: f64,
    /// Wind direction (degrees, counter-clockwise from +x)
    pub wind_direction_deg: f64,
    /// Cells per grid axis
    pub grid_resolution: usize,
    /// Stability class label, `A`..`F`
    pub stability_class: String,
    /// Global multiplier on vehicle emissions
    pub emission_factor: f64,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            wind_speed: 2.0,
            wind_direction_deg: 0.0,
            grid_resolution: 100,
            stability_class: "B".to_string(),
            emission_factor: 0.5,
        }
    }
}

impl ScenarioSettings {
    /// Every problem with the settings, empty when they are usable
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let (min_res, max_res) = constants::SCENARIO_RESOLUTION_RANGE;

        if !self.wind_speed.is_finite()
            || self.wind_speed <= 0.0
            || self.wind_speed > constants::MAX_SCENARIO_WIND_SPEED
        {
            problems.push(format!(
                "wind speed must be in (0, {}] m/s, got {}",
                constants::MAX_SCENARIO_WIND_SPEED,
                self.wind_speed
            ));
        }
        if !self.wind_direction_deg.is_finite() {
            problems.push(format!(
                "wind direction must be finite, got {}",
                self.wind_direction_deg
            ));
        }
        if !(min_res..=max_res).contains(&self.grid_resolution) {
            problems.push(format!(
                "grid resolution must be between {min_res} and {max_res}, got {}",
                self.grid_resolution
            ));
        }
        if !self.emission_factor.is_finite() || self.emission_factor <= 0.0 {
            problems.push(format!(
                "emission factor must be finite and positive, got {}",
                self.emission_factor
            ));
        }
        // Unknown stability labels are not a problem: they resolve to class D
        problems
    }

    /// Check the settings
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::InvalidConfig`] listing every problem found.
    pub fn validate(&self) -> Result<(), KernelError> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(KernelError::InvalidConfig(problems.join("; ")))
        }
    }

    /// Stability class resolved from the label
    pub fn stability(&self) -> StabilityClass {
        StabilityClass::from_label(&self.stability_class)
    }

    /// Atmosphere for the kernel, with the direction converted to radians
    ///
    /// # Errors
    ///
    /// Returns the wind errors of [`Atmosphere::from_degrees`].
    pub fn atmosphere(&self) -> Result<Atmosphere, KernelError> {
        Atmosphere::from_degrees(self.wind_speed, self.wind_direction_deg, self.stability())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_default_config_is_valid() {
        let config = KernelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.near_cutoff, 1.0);
        assert_eq!(config.far_cutoff, 300.0);
        assert_eq!(config.retention_factor, 0.99);
        assert_eq!(config.influence_radius, 100.0);
        assert_eq!(config.scheme, DispersionScheme::ClassDependent);
        assert_eq!(
            KernelConfig::fixed_neutral().scheme,
            DispersionScheme::FixedNeutral
        );
        assert_eq!(
            KernelConfig::historical_table().scheme,
            DispersionScheme::HistoricalTable
        );
        assert!(KernelConfig::historical_table().validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let base = KernelConfig::default();
        let cases = [
            KernelConfig {
                influence_radius: 0.0,
                ..base
            },
            KernelConfig {
                near_cutoff: -1.0,
                ..base
            },
            KernelConfig {
                far_cutoff: 0.5,
                ..base
            },
            KernelConfig {
                far_cutoff: f64::INFINITY,
                ..base
            },
            KernelConfig {
                retention_factor: 0.0,
                ..base
            },
            KernelConfig {
                retention_factor: 1.5,
                ..base
            },
            KernelConfig {
                retention_factor: f64::NAN,
                ..base
            },
            KernelConfig {
                emission: EmissionModel {
                    base_emission: -0.1,
                    ..EmissionModel::default()
                },
                ..base
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(KernelError::InvalidConfig(_))),
                "{config:?}"
            );
        }
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: KernelConfig =
            serde_json::from_str(r#"{ "far_cutoff": 150.0, "scheme": "FixedNeutral" }"#).unwrap();
        assert_eq!(config.far_cutoff, 150.0);
        assert_eq!(config.scheme, DispersionScheme::FixedNeutral);
        assert_eq!(config.near_cutoff, 1.0);
        assert_eq!(config.emission, EmissionModel::default());
    }

    #[test]
    fn test_scenario_settings_defaults() {
        let settings = ScenarioSettings::default();
        assert!(settings.problems().is_empty());
        assert_eq!(settings.stability(), StabilityClass::B);
    }

    #[test]
    fn test_scenario_settings_collects_every_problem() {
        let settings = ScenarioSettings {
            wind_speed: 45.0,
            wind_direction_deg: 0.0,
            grid_resolution: 5,
            stability_class: "Z".to_string(),
            emission_factor: 0.0,
        };
        let problems = settings.problems();
        assert_eq!(problems.len(), 3, "{problems:?}");
        assert!(settings.validate().is_err());
        assert_eq!(settings.stability(), StabilityClass::D);
    }

    #[test]
    fn test_scenario_atmosphere_in_radians() {
        let settings = ScenarioSettings {
            wind_direction_deg: 180.0,
            ..ScenarioSettings::default()
        };
        let atmosphere = settings.atmosphere().unwrap();
        assert_relative_eq!(atmosphere.wind_direction(), PI, epsilon = 1e-12);
        assert_eq!(atmosphere.wind_speed(), 2.0);
        assert_eq!(atmosphere.stability(), StabilityClass::B);
    }
}
