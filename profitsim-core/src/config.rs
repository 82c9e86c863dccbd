//! Engine configuration and per-run options.
use serde::{Deserialize, Serialize};

use crate::breakdown::BreakdownCoefficients;
use crate::distribution::DistributionTable;
use crate::error::{ConfigurationError, ValidationError};
use crate::histogram::HistogramConfig;
use crate::percentile::{DEFAULT_QUANTILES, validate_quantiles};
use crate::runner::{CancelFlag, DEFAULT_SAMPLE_COUNT};

/// Knobs for a single simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOptions {
    #[serde(default = "SimulationOptions::default_sample_count")]
    pub sample_count: usize,
    #[serde(default = "SimulationOptions::default_quantiles")]
    pub quantiles: Vec<f64>,
    #[serde(default)]
    pub histogram: HistogramConfig,
    /// Parallel streams for seeded runs; 1 keeps the run on one stream
    #[serde(default = "SimulationOptions::default_workers")]
    pub workers: usize,
    #[serde(skip)]
    pub cancel: Option<CancelFlag>,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            sample_count: Self::default_sample_count(),
            quantiles: Self::default_quantiles(),
            histogram: HistogramConfig::default(),
            workers: Self::default_workers(),
            cancel: None,
        }
    }
}

impl PartialEq for SimulationOptions {
    fn eq(&self, other: &Self) -> bool {
        self.sample_count == other.sample_count
            && self.quantiles == other.quantiles
            && self.histogram == other.histogram
            && self.workers == other.workers
    }
}

impl SimulationOptions {
    const fn default_sample_count() -> usize {
        DEFAULT_SAMPLE_COUNT
    }

    fn default_quantiles() -> Vec<f64> {
        DEFAULT_QUANTILES.to_vec()
    }

    const fn default_workers() -> usize {
        1
    }

    #[must_use]
    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    #[must_use]
    pub fn with_histogram(mut self, histogram: HistogramConfig) -> Self {
        self.histogram = histogram;
        self
    }

    #[must_use]
    pub fn with_quantiles(mut self, quantiles: Vec<f64>) -> Self {
        self.quantiles = quantiles;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// # Errors
    ///
    /// Returns the first invalid option.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sample_count == 0 {
            return Err(ValidationError::EmptySampleCount);
        }
        validate_quantiles(&self.quantiles)?;
        self.histogram.validate()
    }
}

/// Everything the engine needs besides the profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub distribution: DistributionTable,
    #[serde(default)]
    pub breakdown: BreakdownCoefficients,
    #[serde(default)]
    pub defaults: SimulationOptions,
}

impl EngineConfig {
    /// Parse and validate a configuration document. Missing sections keep
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any section is invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigurationError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns the first invalid section.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.distribution.validate()?;
        self.breakdown.validate()?;
        self.defaults.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::OutsourcingTier;

    #[test]
    fn defaults_match_documented_constants() {
        let options = SimulationOptions::default();
        assert_eq!(options.sample_count, 3000);
        assert_eq!(options.quantiles, vec![0.10, 0.50, 0.90]);
        assert_eq!(options.histogram.bucket_count, 15);
        assert!((options.histogram.range_max - 25.0).abs() < f64::EPSILON);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let json = r#"{
            "defaults": { "sample_count": 500, "histogram": { "range_max": 40.0 } },
            "breakdown": { "overhead": 0.08 }
        }"#;
        let config = EngineConfig::from_json(json).unwrap();
        assert_eq!(config.defaults.sample_count, 500);
        assert_eq!(config.defaults.histogram.bucket_count, 15);
        assert!((config.defaults.histogram.range_max - 40.0).abs() < f64::EPSILON);
        assert!((config.breakdown.overhead - 0.08).abs() < f64::EPSILON);
        assert!((config.breakdown.personnel - 0.65).abs() < f64::EPSILON);
        assert_eq!(config.distribution, DistributionTable::default());
    }

    #[test]
    fn invalid_sections_are_reported() {
        let err = EngineConfig::from_json(r#"{"defaults": {"sample_count": 0}}"#).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::InvalidDefaults(ValidationError::EmptySampleCount)
        );
        assert!(matches!(
            EngineConfig::from_json("{not json"),
            Err(ConfigurationError::Parse(_))
        ));
    }

    #[test]
    fn config_may_omit_a_tier() {
        let json = r#"{
            "distribution": {
                "outsourcing_savings": { "low": { "min": 0.01, "max": 0.02 } }
            }
        }"#;
        let config = EngineConfig::from_json(json).unwrap();
        assert!(
            !config
                .distribution
                .outsourcing_savings
                .contains_key(&OutsourcingTier::High)
        );
    }
}
