//! Façade tying sampling, summarizing and bucketing into one call.
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::breakdown::{CostLine, breakdown};
use crate::config::{EngineConfig, SimulationOptions};
use crate::error::{ConfigurationError, SimulationError};
use crate::histogram::{self, HistogramBucket};
use crate::percentile::{self, PercentilePoint, PercentileValue};
use crate::profile::{InputProfile, RevenueSegment};
use crate::runner::SimulationRunner;
use crate::sampler::{Scenario, ScenarioSampler};

const DAYS_PER_YEAR: f64 = 365.0;

/// Result of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub p10: PercentileValue,
    pub p50: PercentileValue,
    pub p90: PercentileValue,
    /// Points for the quantiles requested in the run options
    pub percentiles: Vec<PercentilePoint>,
    pub current_opex: f64,
    pub breakdown: Vec<CostLine>,
    pub histogram: Vec<HistogramBucket>,
    pub segment: RevenueSegment,
    /// Median savings forgone per day of delay
    pub daily_cost_of_inaction: f64,
    pub sample_count: usize,
    pub seed: Option<u64>,
    /// Population in draw order
    pub scenarios: Vec<Scenario>,
}

impl SimulationSummary {
    /// Median savings forgone after `days` of delay.
    #[must_use]
    pub fn cost_of_inaction(&self, days: u32) -> f64 {
        self.daily_cost_of_inaction * f64::from(days)
    }
}

/// Monte Carlo savings engine.
#[derive(Debug, Clone, Default)]
pub struct SimulationEngine {
    config: EngineConfig,
}

impl SimulationEngine {
    /// Create an engine from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run with the caller's RNG. `None` uses the configured default options.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any sampling if the profile or
    /// options are invalid, a configuration error if the distribution table
    /// lacks one of the profile's tiers, or `Cancelled` if the run is stopped.
    pub fn run_simulation<R: Rng + ?Sized>(
        &self,
        profile: &InputProfile,
        options: Option<&SimulationOptions>,
        rng: &mut R,
    ) -> Result<SimulationSummary, SimulationError> {
        let options = options.unwrap_or(&self.config.defaults);
        let sampler = self.prepare(profile, options)?;
        let scenarios = SimulationRunner::new(&sampler)
            .with_cancel(options.cancel.as_ref())
            .run(options.sample_count, rng)?;
        self.summarize(profile, options, scenarios, None)
    }

    /// Run from a seed, fanning out across `options.workers` streams.
    ///
    /// A single worker draws from `ChaCha20Rng::seed_from_u64(seed)`, so the
    /// result equals [`SimulationEngine::run_simulation`] with that RNG.
    ///
    /// # Errors
    ///
    /// Same as [`SimulationEngine::run_simulation`].
    pub fn run_seeded(
        &self,
        profile: &InputProfile,
        options: Option<&SimulationOptions>,
        seed: u64,
    ) -> Result<SimulationSummary, SimulationError> {
        let options = options.unwrap_or(&self.config.defaults);
        let sampler = self.prepare(profile, options)?;
        let runner = SimulationRunner::new(&sampler).with_cancel(options.cancel.as_ref());
        let scenarios = if options.workers > 1 {
            runner.run_parallel(options.sample_count, seed, options.workers)?
        } else {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            runner.run(options.sample_count, &mut rng)?
        };
        self.summarize(profile, options, scenarios, Some(seed))
    }

    fn prepare(
        &self,
        profile: &InputProfile,
        options: &SimulationOptions,
    ) -> Result<ScenarioSampler, SimulationError> {
        profile.validate()?;
        options.validate()?;
        let sampler = ScenarioSampler::new(&self.config.distribution, profile)?;
        debug!(
            "profile {}/{} opex {:.3}M, savings fraction bounds {:?}",
            profile.ai_readiness,
            profile.outsourcing,
            sampler.current_opex(),
            sampler.fraction_bounds()
        );
        Ok(sampler)
    }

    fn summarize(
        &self,
        profile: &InputProfile,
        options: &SimulationOptions,
        scenarios: Vec<Scenario>,
        seed: Option<u64>,
    ) -> Result<SimulationSummary, SimulationError> {
        let sorted = percentile::sorted_population(&scenarios);
        let triplet = percentile::triplet(&sorted)?;
        let percentiles = percentile::summarize_sorted(&sorted, &options.quantiles)?;
        let histogram = histogram::build(&scenarios, &options.histogram)?;
        Ok(SimulationSummary {
            p10: triplet.p10,
            p50: triplet.p50,
            p90: triplet.p90,
            percentiles,
            current_opex: profile.current_opex(),
            breakdown: breakdown(profile, &self.config.breakdown),
            histogram,
            segment: profile.segment(),
            daily_cost_of_inaction: triplet.p50.amount / DAYS_PER_YEAR,
            sample_count: scenarios.len(),
            seed,
            scenarios,
        })
    }
}

/// Run with the built-in configuration.
///
/// # Errors
///
/// See [`SimulationEngine::run_simulation`].
pub fn run_simulation<R: Rng + ?Sized>(
    profile: &InputProfile,
    options: Option<&SimulationOptions>,
    rng: &mut R,
) -> Result<SimulationSummary, SimulationError> {
    SimulationEngine::default().run_simulation(profile, options, rng)
}
