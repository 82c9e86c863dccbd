//! Fixed-width probability histogram of savings percent.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::numbers::{clamped_index, usize_to_f64};
use crate::sampler::Scenario;

/// Bucket layout for the savings-percent axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramConfig {
    #[serde(default = "HistogramConfig::default_bucket_count")]
    pub bucket_count: usize,
    #[serde(default)]
    pub range_min: f64,
    #[serde(default = "HistogramConfig::default_range_max")]
    pub range_max: f64,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            bucket_count: Self::default_bucket_count(),
            range_min: 0.0,
            range_max: Self::default_range_max(),
        }
    }
}

impl HistogramConfig {
    const fn default_bucket_count() -> usize {
        15
    }

    const fn default_range_max() -> f64 {
        25.0
    }

    /// # Errors
    ///
    /// Returns an error for zero buckets, an empty or non-finite range, or a
    /// range whose bucket width overflows or underflows.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bucket_count == 0 {
            return Err(ValidationError::NoBuckets);
        }
        if !self.range_min.is_finite()
            || !self.range_max.is_finite()
            || self.range_min >= self.range_max
        {
            return Err(ValidationError::HistogramRange {
                min: self.range_min,
                max: self.range_max,
            });
        }
        let width = self.bucket_width();
        if !width.is_normal() || width <= 0.0 {
            return Err(ValidationError::HistogramWidth { width });
        }
        Ok(())
    }

    #[must_use]
    pub fn bucket_width(&self) -> f64 {
        (self.range_max - self.range_min) / usize_to_f64(self.bucket_count)
    }

    /// Bucket for a savings percent.
    ///
    /// Values at or above `range_max` land in the last bucket and values
    /// below `range_min` in the first, so all overflow mass is displayed at
    /// the edges rather than dropped.
    #[must_use]
    pub fn bucket_index(&self, savings_percent: f64) -> usize {
        if savings_percent >= self.range_max {
            return self.bucket_count.saturating_sub(1);
        }
        clamped_index(
            (savings_percent - self.range_min) / self.bucket_width(),
            self.bucket_count,
        )
    }
}

/// One bar of the histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub range_label: String,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    /// Share of the population in this bucket, in percent
    pub probability: f64,
}

/// Bucket `scenarios` according to `config`.
///
/// # Errors
///
/// Returns an error for an invalid config or an empty population.
pub fn build(
    scenarios: &[Scenario],
    config: &HistogramConfig,
) -> Result<Vec<HistogramBucket>, ValidationError> {
    config.validate()?;
    if scenarios.is_empty() {
        return Err(ValidationError::EmptyPopulation);
    }
    let mut counts = vec![0_usize; config.bucket_count];
    for scenario in scenarios {
        counts[config.bucket_index(scenario.savings_percent)] += 1;
    }

    let overflow = scenarios
        .iter()
        .filter(|s| s.savings_percent >= config.range_max)
        .count();
    if overflow > 0 {
        debug!(
            "{overflow} scenarios at or above {:.1}% folded into the last bucket",
            config.range_max
        );
    }

    let total = usize_to_f64(scenarios.len());
    let width = config.bucket_width();
    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| {
            let lower = config.range_min + usize_to_f64(index) * width;
            let upper = config.range_min + usize_to_f64(index + 1) * width;
            HistogramBucket {
                range_label: format!("{lower:.1}-{upper:.1}%"),
                lower,
                upper,
                count,
                probability: usize_to_f64(count) / total * 100.0,
            }
        })
        .collect())
}
