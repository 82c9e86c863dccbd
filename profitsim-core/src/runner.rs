//! Builds the scenario population by repeated sampling.
//!
//! Sequential runs draw from the caller's RNG. Parallel runs give each worker
//! its own derived stream and concatenate partitions in worker order, so a
//! `(seed, workers)` pair always yields the same population.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, trace};
use rand::Rng;
use rayon::prelude::*;

use crate::error::{SimulationError, ValidationError};
use crate::rng::worker_rng;
use crate::sampler::{Scenario, ScenarioSampler};

pub const DEFAULT_SAMPLE_COUNT: usize = 3000;

/// Draws between cancellation polls.
pub const CANCEL_CHECK_INTERVAL: usize = 1024;

/// Shared flag a caller raises to stop a long run.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Repeats a resolved sampler `sample_count` times.
#[derive(Debug, Clone, Copy)]
pub struct SimulationRunner<'a> {
    sampler: &'a ScenarioSampler,
    cancel: Option<&'a CancelFlag>,
}

impl<'a> SimulationRunner<'a> {
    #[must_use]
    pub const fn new(sampler: &'a ScenarioSampler) -> Self {
        Self {
            sampler,
            cancel: None,
        }
    }

    #[must_use]
    pub const fn with_cancel(mut self, cancel: Option<&'a CancelFlag>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Draw `sample_count` scenarios from `rng`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero sample count, or
    /// [`SimulationError::Cancelled`] if the cancel flag is raised mid-run.
    pub fn run<R: Rng + ?Sized>(
        &self,
        sample_count: usize,
        rng: &mut R,
    ) -> Result<Vec<Scenario>, SimulationError> {
        if sample_count == 0 {
            return Err(ValidationError::EmptySampleCount.into());
        }
        debug!("running {sample_count} scenarios sequentially");
        let scenarios = self.fill(sample_count, rng);
        if scenarios.len() < sample_count {
            return Err(SimulationError::Cancelled {
                completed: scenarios.len(),
                requested: sample_count,
            });
        }
        Ok(scenarios)
    }

    /// Draw `sample_count` scenarios across `workers` independent streams.
    ///
    /// # Errors
    ///
    /// Same as [`SimulationRunner::run`].
    pub fn run_parallel(
        &self,
        sample_count: usize,
        seed: u64,
        workers: usize,
    ) -> Result<Vec<Scenario>, SimulationError> {
        if sample_count == 0 {
            return Err(ValidationError::EmptySampleCount.into());
        }
        let shares = partition(sample_count, workers);
        debug!(
            "running {sample_count} scenarios across {} workers",
            shares.len()
        );
        let partitions: Vec<Vec<Scenario>> = shares
            .par_iter()
            .enumerate()
            .map(|(worker, &share)| {
                trace!("worker {worker} drawing {share} scenarios");
                let mut rng = worker_rng(seed, worker);
                self.fill(share, &mut rng)
            })
            .collect();
        let scenarios: Vec<Scenario> = partitions.into_iter().flatten().collect();
        if scenarios.len() < sample_count {
            return Err(SimulationError::Cancelled {
                completed: scenarios.len(),
                requested: sample_count,
            });
        }
        Ok(scenarios)
    }

    fn fill<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Scenario> {
        let mut scenarios = Vec::with_capacity(count);
        for index in 0..count {
            if index % CANCEL_CHECK_INTERVAL == 0 && self.cancelled() {
                break;
            }
            scenarios.push(self.sampler.sample(rng));
        }
        scenarios
    }

    fn cancelled(&self) -> bool {
        self.cancel.is_some_and(CancelFlag::is_cancelled)
    }
}

/// Split `total` draws over at most `workers` non-empty shares.
#[must_use]
pub fn partition(total: usize, workers: usize) -> Vec<usize> {
    let workers = workers.clamp(1, total.max(1));
    let base = total / workers;
    let extra = total % workers;
    (0..workers)
        .map(|worker| base + usize::from(worker < extra))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::DistributionTable;
    use crate::profile::InputProfile;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn sampler() -> ScenarioSampler {
        ScenarioSampler::new(&DistributionTable::default(), &InputProfile::default()).unwrap()
    }

    #[test]
    fn run_collects_every_draw() {
        let sampler = sampler();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let scenarios = SimulationRunner::new(&sampler)
            .run(DEFAULT_SAMPLE_COUNT, &mut rng)
            .unwrap();
        assert_eq!(scenarios.len(), DEFAULT_SAMPLE_COUNT);
    }

    #[test]
    fn zero_samples_is_rejected() {
        let sampler = sampler();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let err = SimulationRunner::new(&sampler).run(0, &mut rng).unwrap_err();
        assert_eq!(err, SimulationError::Validation(ValidationError::EmptySampleCount));
    }

    #[test]
    fn partition_spreads_remainder() {
        assert_eq!(partition(10, 3), vec![4, 3, 3]);
        assert_eq!(partition(2, 8), vec![1, 1]);
        assert_eq!(partition(5, 0), vec![5]);
        assert_eq!(partition(3000, 4).iter().sum::<usize>(), 3000);
    }

    #[test]
    fn parallel_run_is_reproducible() {
        let sampler = sampler();
        let runner = SimulationRunner::new(&sampler);
        let first = runner.run_parallel(5000, 99, 4).unwrap();
        let second = runner.run_parallel(5000, 99, 4).unwrap();
        assert_eq!(first.len(), 5000);
        assert_eq!(first, second);
    }

    #[test]
    fn raised_flag_cancels_run() {
        let sampler = sampler();
        let flag = CancelFlag::new();
        flag.cancel();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let err = SimulationRunner::new(&sampler)
            .with_cancel(Some(&flag))
            .run(100, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            SimulationError::Cancelled {
                completed: 0,
                requested: 100
            }
        );
        let err = SimulationRunner::new(&sampler)
            .with_cancel(Some(&flag))
            .run_parallel(100, 1, 2)
            .unwrap_err();
        assert!(matches!(err, SimulationError::Cancelled { .. }));
    }
}
