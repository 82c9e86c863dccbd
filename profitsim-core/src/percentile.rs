//! Order-statistic percentiles over the scenario population.
//!
//! The estimator takes the scenario at index `floor(N * q)` of the population
//! sorted by savings percent. It does not interpolate between neighbours, so
//! it reads slightly low compared with linear interpolation; at the
//! population sizes used here the difference is well below display precision.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::numbers::{clamped_index, usize_to_f64};
use crate::sampler::Scenario;

pub const DEFAULT_QUANTILES: [f64; 3] = [0.10, 0.50, 0.90];

/// Savings at one percentile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileValue {
    pub percent: f64,
    pub amount: f64,
}

impl From<Scenario> for PercentileValue {
    fn from(scenario: Scenario) -> Self {
        Self {
            percent: scenario.savings_percent,
            amount: scenario.savings_amount,
        }
    }
}

/// A requested quantile and the scenario selected for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentilePoint {
    pub quantile: f64,
    #[serde(flatten)]
    pub value: PercentileValue,
}

/// Conservative, likely and optimistic estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileTriplet {
    pub p10: PercentileValue,
    pub p50: PercentileValue,
    pub p90: PercentileValue,
}

/// Check that every quantile lies in `[0, 1)`.
///
/// # Errors
///
/// Returns an error for an empty list or an out-of-range quantile.
pub fn validate_quantiles(quantiles: &[f64]) -> Result<(), ValidationError> {
    if quantiles.is_empty() {
        return Err(ValidationError::NoQuantiles);
    }
    if let Some(&bad) = quantiles
        .iter()
        .find(|q| !q.is_finite() || !(0.0..1.0).contains(*q))
    {
        return Err(ValidationError::QuantileOutOfRange { value: bad });
    }
    Ok(())
}

/// Copy of the population sorted ascending by savings percent.
#[must_use]
pub fn sorted_population(scenarios: &[Scenario]) -> Vec<Scenario> {
    let mut sorted = scenarios.to_vec();
    sorted.sort_unstable_by(|a, b| a.savings_percent.total_cmp(&b.savings_percent));
    sorted
}

/// Index of quantile `q` in a sorted population of `len` scenarios.
#[must_use]
pub fn order_index(len: usize, quantile: f64) -> usize {
    clamped_index(usize_to_f64(len) * quantile, len)
}

/// Pick the requested quantiles from an already sorted population.
///
/// # Errors
///
/// Returns an error for an empty population or invalid quantiles.
pub fn summarize_sorted(
    sorted: &[Scenario],
    quantiles: &[f64],
) -> Result<Vec<PercentilePoint>, ValidationError> {
    if sorted.is_empty() {
        return Err(ValidationError::EmptyPopulation);
    }
    validate_quantiles(quantiles)?;
    Ok(quantiles
        .iter()
        .map(|&quantile| PercentilePoint {
            quantile,
            value: sorted[order_index(sorted.len(), quantile)].into(),
        })
        .collect())
}

/// Sort `scenarios` and pick the requested quantiles.
///
/// # Errors
///
/// Returns an error for an empty population or invalid quantiles.
pub fn summarize(
    scenarios: &[Scenario],
    quantiles: &[f64],
) -> Result<Vec<PercentilePoint>, ValidationError> {
    summarize_sorted(&sorted_population(scenarios), quantiles)
}

/// P10/P50/P90 from an already sorted population.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyPopulation`] for an empty slice.
pub fn triplet(sorted: &[Scenario]) -> Result<PercentileTriplet, ValidationError> {
    let points = summarize_sorted(sorted, &DEFAULT_QUANTILES)?;
    Ok(PercentileTriplet {
        p10: points[0].value,
        p50: points[1].value,
        p90: points[2].value,
    })
}
