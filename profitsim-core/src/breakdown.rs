//! Decomposition of current OpEx into named cost categories.
//!
//! Personnel, operations and overhead use fixed shares while technology uses
//! the profile's own tech-spend share. The four shares are not normalized, so
//! the lines can add up to more or less than the current OpEx.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::profile::InputProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostCategory {
    Personnel,
    Technology,
    Operations,
    Overhead,
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Personnel => write!(f, "Personnel"),
            Self::Technology => write!(f, "Technology"),
            Self::Operations => write!(f, "Operations"),
            Self::Overhead => write!(f, "Overhead"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub category: CostCategory,
    pub amount: f64,
}

/// Fixed category shares of current OpEx.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakdownCoefficients {
    #[serde(default = "BreakdownCoefficients::default_personnel")]
    pub personnel: f64,
    #[serde(default = "BreakdownCoefficients::default_operations")]
    pub operations: f64,
    #[serde(default = "BreakdownCoefficients::default_overhead")]
    pub overhead: f64,
}

impl Default for BreakdownCoefficients {
    fn default() -> Self {
        Self {
            personnel: Self::default_personnel(),
            operations: Self::default_operations(),
            overhead: Self::default_overhead(),
        }
    }
}

impl BreakdownCoefficients {
    const fn default_personnel() -> f64 {
        0.65
    }

    const fn default_operations() -> f64 {
        0.15
    }

    const fn default_overhead() -> f64 {
        0.12
    }

    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidCoefficient`] for a negative or
    /// non-finite share.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("personnel", self.personnel),
            ("operations", self.operations),
            ("overhead", self.overhead),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidCoefficient { name, value });
            }
        }
        Ok(())
    }
}

/// Category lines for a profile, in display order.
#[must_use]
pub fn breakdown(profile: &InputProfile, coefficients: &BreakdownCoefficients) -> Vec<CostLine> {
    let opex = profile.current_opex();
    vec![
        CostLine {
            category: CostCategory::Personnel,
            amount: opex * coefficients.personnel,
        },
        CostLine {
            category: CostCategory::Technology,
            amount: opex * (profile.tech_spend_percent / 100.0),
        },
        CostLine {
            category: CostCategory::Operations,
            amount: opex * coefficients.operations,
        },
        CostLine {
            category: CostCategory::Overhead,
            amount: opex * coefficients.overhead,
        },
    ]
}
