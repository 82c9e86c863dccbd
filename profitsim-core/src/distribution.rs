//! Uncertainty ranges keyed by categorical tier.
use std::collections::BTreeMap;

use rand::Rng;
use rand::distributions::{Distribution, Standard};
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::profile::{AiReadinessTier, OutsourcingTier};

/// Closed interval a savings factor is drawn from uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformRange {
    pub min: f64,
    pub max: f64,
}

impl UniformRange {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Draw one value using a single unit variate from `rng`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let unit: f64 = Standard.sample(rng);
        unit * self.width() + self.min
    }

    fn check(&self, name: &str) -> Result<(), ConfigurationError> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidRange {
                name: name.to_string(),
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Tier lookup key for [`DistributionTable::range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    AiReadiness(AiReadinessTier),
    Outsourcing(OutsourcingTier),
}

/// Static mapping from tier to uniform savings range.
///
/// The built-in table covers every tier; tables loaded from configuration
/// may omit entries, in which case lookups fail instead of guessing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionTable {
    #[serde(default = "DistributionTable::default_ai_savings")]
    pub ai_savings: BTreeMap<AiReadinessTier, UniformRange>,
    #[serde(default = "DistributionTable::default_outsourcing_savings")]
    pub outsourcing_savings: BTreeMap<OutsourcingTier, UniformRange>,
    #[serde(default = "DistributionTable::default_process_savings")]
    pub process_savings: UniformRange,
    #[serde(default = "DistributionTable::default_change_success")]
    pub change_success: UniformRange,
}

impl Default for DistributionTable {
    fn default() -> Self {
        Self {
            ai_savings: Self::default_ai_savings(),
            outsourcing_savings: Self::default_outsourcing_savings(),
            process_savings: Self::default_process_savings(),
            change_success: Self::default_change_success(),
        }
    }
}

impl DistributionTable {
    fn default_ai_savings() -> BTreeMap<AiReadinessTier, UniformRange> {
        BTreeMap::from([
            (AiReadinessTier::Beginner, UniformRange::new(0.03, 0.08)),
            (AiReadinessTier::Learning, UniformRange::new(0.06, 0.12)),
            (AiReadinessTier::Adopter, UniformRange::new(0.10, 0.18)),
        ])
    }

    fn default_outsourcing_savings() -> BTreeMap<OutsourcingTier, UniformRange> {
        BTreeMap::from([
            (OutsourcingTier::Low, UniformRange::new(0.02, 0.06)),
            (OutsourcingTier::Medium, UniformRange::new(0.04, 0.10)),
            (OutsourcingTier::High, UniformRange::new(0.06, 0.15)),
        ])
    }

    const fn default_process_savings() -> UniformRange {
        UniformRange::new(0.05, 0.20)
    }

    const fn default_change_success() -> UniformRange {
        UniformRange::new(0.65, 0.85)
    }

    /// Look up the savings range for a tier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingTier`] if the table has no entry.
    pub fn range(&self, tier: Tier) -> Result<UniformRange, ConfigurationError> {
        let (found, table, name) = match tier {
            Tier::AiReadiness(t) => (self.ai_savings.get(&t), "ai_savings", t.as_str()),
            Tier::Outsourcing(t) => (
                self.outsourcing_savings.get(&t),
                "outsourcing_savings",
                t.as_str(),
            ),
        };
        found.copied().ok_or_else(|| ConfigurationError::MissingTier {
            table,
            tier: name.to_string(),
        })
    }

    /// Check that every present range is finite and ordered.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidRange`] for the first bad range.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (tier, range) in &self.ai_savings {
            range.check(&format!("ai_savings.{tier}"))?;
        }
        for (tier, range) in &self.outsourcing_savings {
            range.check(&format!("outsourcing_savings.{tier}"))?;
        }
        self.process_savings.check("process_savings")?;
        self.change_success.check("change_success")
    }
}
