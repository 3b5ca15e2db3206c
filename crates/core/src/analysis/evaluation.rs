//! Model evaluation against paired observations
//!
//! Standard air-quality model performance statistics. Pairs where either value
//! is NaN are dropped before anything is computed.

use crate::error::KernelError;
use serde::{Deserialize, Serialize};

/// Descriptive statistics of one series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesStats {
    fn from_values(values: &[f64]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        Self {
            mean,
            std: variance.sqrt(),
            min,
            max,
        }
    }
}

/// Performance of simulated concentrations against observations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    /// Pairs used after dropping NaN
    pub n_points: usize,
    /// Root mean square error
    pub rmse: f64,
    /// Mean absolute error
    pub mae: f64,
    /// Mean of `simulated − observed`
    pub bias: f64,
    /// Bias as a percentage of the observed mean, 0 when that mean is 0
    pub normalized_bias: f64,
    /// Pearson correlation, 0 when either series is constant
    pub correlation: f64,
    /// Coefficient of determination of simulated against observed
    pub r2: f64,
    /// Willmott index of agreement, 1 when the denominator vanishes
    pub index_of_agreement: f64,
    /// Fraction of pairs with `0.5 ≤ sim/obs ≤ 2` among positive observations
    pub factor_of_2: f64,
    /// `2 (mean_sim − mean_obs) / (mean_obs + mean_sim)`, 0 when the means sum to 0
    pub fractional_bias: f64,
    pub observed: SeriesStats,
    pub simulated: SeriesStats,
}

impl ValidationMetrics {
    /// Compare paired series
    ///
    /// Returns `Ok(None)` when no pair survives NaN filtering.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::SeriesMismatch`] if the series lengths differ.
    pub fn evaluate(observed: &[f64], simulated: &[f64]) -> Result<Option<Self>, KernelError> {
        if observed.len() != simulated.len() {
            return Err(KernelError::SeriesMismatch {
                observed: observed.len(),
                simulated: simulated.len(),
            });
        }

        let (obs, sim): (Vec<f64>, Vec<f64>) = observed
            .iter()
            .zip(simulated)
            .filter(|(o, s)| !o.is_nan() && !s.is_nan())
            .map(|(&o, &s)| (o, s))
            .unzip();

        if obs.is_empty() {
            return Ok(None);
        }

        let n = obs.len() as f64;
        let obs_stats = SeriesStats::from_values(&obs);
        let sim_stats = SeriesStats::from_values(&sim);

        let mut sq_error = 0.0;
        let mut abs_error = 0.0;
        let mut covariance = 0.0;
        let mut obs_spread = 0.0;
        let mut sim_spread = 0.0;
        let mut agreement_den = 0.0;
        for (&o, &s) in obs.iter().zip(&sim) {
            let err = s - o;
            sq_error += err * err;
            abs_error += err.abs();
            let (obs_dev, sim_dev) = (o - obs_stats.mean, s - sim_stats.mean);
            covariance += obs_dev * sim_dev;
            obs_spread += obs_dev * obs_dev;
            sim_spread += sim_dev * sim_dev;
            agreement_den += ((s - obs_stats.mean).abs() + obs_dev.abs()).powi(2);
        }

        let bias = sim_stats.mean - obs_stats.mean;
        let normalized_bias = if obs_stats.mean == 0.0 {
            0.0
        } else {
            bias / obs_stats.mean * 100.0
        };
        let correlation = if obs_spread > 0.0 && sim_spread > 0.0 {
            covariance / (obs_spread * sim_spread).sqrt()
        } else {
            0.0
        };
        let r2 = if obs_spread > 0.0 {
            1.0 - sq_error / obs_spread
        } else if sq_error == 0.0 {
            1.0
        } else {
            0.0
        };
        let index_of_agreement = if agreement_den == 0.0 {
            1.0
        } else {
            1.0 - sq_error / agreement_den
        };
        let mean_sum = obs_stats.mean + sim_stats.mean;
        let fractional_bias = if mean_sum == 0.0 {
            0.0
        } else {
            2.0 * bias / mean_sum
        };

        Ok(Some(Self {
            n_points: obs.len(),
            rmse: (sq_error / n).sqrt(),
            mae: abs_error / n,
            bias,
            normalized_bias,
            correlation,
            r2,
            index_of_agreement,
            factor_of_2: factor_of_2(&obs, &sim),
            fractional_bias,
            observed: obs_stats,
            simulated: sim_stats,
        }))
    }

    /// Rule-of-thumb acceptance used for urban dispersion models:
    /// `|FB| ≤ 0.3` and `FAC2 ≥ 0.5`
    pub fn is_acceptable(&self) -> bool {
        self.fractional_bias.abs() <= 0.3 && self.factor_of_2 >= 0.5
    }
}

fn factor_of_2(obs: &[f64], sim: &[f64]) -> f64 {
    let (positive, within) = obs
        .iter()
        .zip(sim)
        .filter(|(o, _)| **o > 0.0)
        .fold((0usize, 0usize), |(positive, within), (&o, &s)| {
            let ratio = s / o;
            (positive + 1, within + usize::from((0.5..=2.0).contains(&ratio)))
        });
    if positive == 0 {
        0.0
    } else {
        within as f64 / positive as f64
    }
}
