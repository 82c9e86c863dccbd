//! Error taxonomy for the savings engine.
//!
//! Validation failures are raised before any sampling happens; configuration
//! failures surface when a distribution table or coefficient set cannot serve
//! a profile. Neither is ever folded into a `NaN` result field.

use thiserror::Error;

/// Raised when an input profile or run option violates a domain constraint.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("sample count must be at least 1")]
    EmptySampleCount,
    #[error("at least one quantile must be requested")]
    NoQuantiles,
    #[error("quantile {value} must lie in [0, 1)")]
    QuantileOutOfRange { value: f64 },
    #[error("histogram needs at least one bucket")]
    NoBuckets,
    #[error("histogram range minimum {min} must be below maximum {max}")]
    HistogramRange { min: f64, max: f64 },
    #[error("histogram bucket width {width} is not a positive normal number")]
    HistogramWidth { width: f64 },
    #[error("scenario population is empty")]
    EmptyPopulation,
    #[error("unknown {field} tier `{value}`")]
    UnknownTier { field: &'static str, value: String },
    #[error("profile could not be parsed: {0}")]
    Malformed(String),
}

/// Raised when engine configuration cannot serve a request.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("distribution table has no {table} entry for tier `{tier}`")]
    MissingTier { table: &'static str, tier: String },
    #[error("{name} range is invalid (min {min}, max {max})")]
    InvalidRange { name: String, min: f64, max: f64 },
    #[error("breakdown coefficient `{name}` must be finite and non-negative (got {value})")]
    InvalidCoefficient { name: &'static str, value: f64 },
    #[error("configuration default options are invalid: {0}")]
    InvalidDefaults(#[from] ValidationError),
    #[error("configuration could not be parsed: {0}")]
    Parse(String),
}

/// Umbrella error returned from the engine façade.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("simulation cancelled after {completed} of {requested} scenarios")]
    Cancelled { completed: usize, requested: usize },
}

impl SimulationError {
    /// Whether this error stems from caller input rather than engine setup.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
