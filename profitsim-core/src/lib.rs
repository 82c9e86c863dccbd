//! Profitsim Engine
//!
//! Monte Carlo estimation of the operating-cost savings a business could
//! realize, reported as P10/P50/P90 percentiles, a probability histogram and
//! a cost-category breakdown of current spend.
//!
//! The engine is a pure computation: it takes a validated [`InputProfile`]
//! and an explicit random source and returns a [`SimulationSummary`].

pub mod breakdown;
pub mod config;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod histogram;
pub mod numbers;
pub mod percentile;
pub mod profile;
pub mod rng;
pub mod runner;
pub mod sampler;

// Re-export commonly used types
pub use breakdown::{BreakdownCoefficients, CostCategory, CostLine, breakdown};
pub use config::{EngineConfig, SimulationOptions};
pub use distribution::{DistributionTable, Tier, UniformRange};
pub use engine::{SimulationEngine, SimulationSummary, run_simulation};
pub use error::{ConfigurationError, SimulationError, ValidationError};
pub use histogram::{HistogramBucket, HistogramConfig};
pub use percentile::{
    DEFAULT_QUANTILES, PercentilePoint, PercentileTriplet, PercentileValue, summarize,
};
pub use profile::{AiReadinessTier, InputProfile, OutsourcingTier, RevenueSegment};
pub use rng::{CountingRng, derive_stream_seed, worker_rng};
pub use runner::{CancelFlag, DEFAULT_SAMPLE_COUNT, SimulationRunner};
pub use sampler::{Scenario, ScenarioSampler};
