//! Draws one randomized savings outcome for a profile.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distribution::{DistributionTable, Tier, UniformRange};
use crate::error::ConfigurationError;
use crate::profile::InputProfile;

/// One simulated savings outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Combined savings fraction expressed as a percentage of OpEx
    pub savings_percent: f64,
    /// Savings in the same unit as `current_opex` (millions)
    pub savings_amount: f64,
}

/// Sampler with every range and multiplier resolved for one profile.
///
/// Resolution happens once up front so a missing table entry fails before
/// any entropy is consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioSampler {
    ai_savings: UniformRange,
    process_savings: UniformRange,
    outsourcing_savings: UniformRange,
    change_success: UniformRange,
    maturity_multiplier: f64,
    tech_multiplier: f64,
    current_opex: f64,
}

impl ScenarioSampler {
    /// Resolve the sampler for a profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingTier`] if either of the profile's
    /// tiers is absent from `table`.
    pub fn new(table: &DistributionTable, profile: &InputProfile) -> Result<Self, ConfigurationError> {
        let ai_savings = table.range(Tier::AiReadiness(profile.ai_readiness))?;
        let outsourcing_savings = table.range(Tier::Outsourcing(profile.outsourcing))?;
        Ok(Self {
            ai_savings,
            process_savings: table.process_savings,
            outsourcing_savings,
            change_success: table.change_success,
            maturity_multiplier: profile.maturity_multiplier(),
            tech_multiplier: profile.tech_multiplier(),
            current_opex: profile.current_opex(),
        })
    }

    /// Draw one scenario, consuming exactly four variates from `rng`.
    ///
    /// The combined fraction is not clamped; values past the histogram
    /// ceiling pass through unchanged.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Scenario {
        let ai = self.ai_savings.sample(rng);
        let process = self.process_savings.sample(rng);
        let outsourcing = self.outsourcing_savings.sample(rng);
        let change_success = self.change_success.sample(rng);
        self.combine(ai, process, outsourcing, change_success)
    }

    fn combine(&self, ai: f64, process: f64, outsourcing: f64, change_success: f64) -> Scenario {
        let fraction = (ai + process * self.maturity_multiplier + outsourcing)
            * change_success
            * self.tech_multiplier;
        Scenario {
            savings_percent: fraction * 100.0,
            savings_amount: self.current_opex * fraction,
        }
    }

    /// Smallest and largest combined savings fraction this sampler can produce.
    #[must_use]
    pub fn fraction_bounds(&self) -> (f64, f64) {
        let low = self.combine(
            self.ai_savings.min,
            self.process_savings.min,
            self.outsourcing_savings.min,
            self.change_success.min,
        );
        let high = self.combine(
            self.ai_savings.max,
            self.process_savings.max,
            self.outsourcing_savings.max,
            self.change_success.max,
        );
        (low.savings_percent / 100.0, high.savings_percent / 100.0)
    }

    #[must_use]
    pub const fn current_opex(&self) -> f64 {
        self.current_opex
    }
}

/// Resolve a sampler for `profile` and draw a single scenario.
///
/// # Errors
///
/// Returns [`ConfigurationError::MissingTier`] when the table lacks a tier.
pub fn sample<R: Rng + ?Sized>(
    profile: &InputProfile,
    table: &DistributionTable,
    rng: &mut R,
) -> Result<Scenario, ConfigurationError> {
    Ok(ScenarioSampler::new(table, profile)?.sample(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{AiReadinessTier, OutsourcingTier};
    use crate::rng::CountingRng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn low_profile() -> InputProfile {
        InputProfile {
            ai_readiness: AiReadinessTier::Beginner,
            outsourcing: OutsourcingTier::Low,
            process_maturity_percent: 30.0,
            tech_spend_percent: 2.0,
            ..InputProfile::default()
        }
    }

    #[test]
    fn sample_consumes_four_draws() {
        let sampler = ScenarioSampler::new(&DistributionTable::default(), &low_profile()).unwrap();
        let mut rng = CountingRng::new(SmallRng::seed_from_u64(1));
        let _ = sampler.sample(&mut rng);
        assert_eq!(rng.draws(), 4);
    }

    #[test]
    fn amount_tracks_percent_of_opex() {
        let profile = low_profile();
        let mut rng = SmallRng::seed_from_u64(2);
        let scenario = sample(&profile, &DistributionTable::default(), &mut rng).unwrap();
        let expected = profile.current_opex() * scenario.savings_percent / 100.0;
        assert!((scenario.savings_amount - expected).abs() < 1e-12);
    }

    #[test]
    fn bounds_match_hand_computed_extremes() {
        let sampler = ScenarioSampler::new(&DistributionTable::default(), &low_profile()).unwrap();
        let (low, high) = sampler.fraction_bounds();
        let expected_low = (0.03 + 0.05 * 0.3 + 0.02) * 0.65 * 0.2;
        let expected_high = (0.08 + 0.20 * 0.3 + 0.06) * 0.85 * 0.2;
        assert!((low - expected_low).abs() < 1e-12);
        assert!((high - expected_high).abs() < 1e-12);
    }

    #[test]
    fn missing_tier_fails_before_sampling() {
        let mut table = DistributionTable::default();
        table.ai_savings.clear();
        let mut rng = CountingRng::new(SmallRng::seed_from_u64(3));
        let err = sample(&low_profile(), &table, &mut rng).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingTier { .. }));
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn high_tiers_can_exceed_display_ceiling() {
        let profile = InputProfile {
            ai_readiness: AiReadinessTier::Adopter,
            outsourcing: OutsourcingTier::High,
            process_maturity_percent: 100.0,
            tech_spend_percent: 20.0,
            ..InputProfile::default()
        };
        let sampler = ScenarioSampler::new(&DistributionTable::default(), &profile).unwrap();
        let (_, high) = sampler.fraction_bounds();
        assert!(high * 100.0 > 25.0);
    }
}
