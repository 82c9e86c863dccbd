//! Business profile supplied by the caller before a simulation run.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How far along an organisation is in adopting AI tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiReadinessTier {
    /// Just starting out
    Beginner,
    /// Experimenting with a few use cases
    Learning,
    /// AI is part of day-to-day operations
    Adopter,
}

impl AiReadinessTier {
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Learning, Self::Adopter];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Learning => "learning",
            Self::Adopter => "adopter",
        }
    }
}

/// Share of operations already handed to outside providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutsourcingTier {
    Low,
    Medium,
    High,
}

impl OutsourcingTier {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for AiReadinessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OutsourcingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiReadinessTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == needle)
            .ok_or_else(|| ValidationError::UnknownTier {
                field: "ai_readiness",
                value: s.to_string(),
            })
    }
}

impl FromStr for OutsourcingTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == needle)
            .ok_or_else(|| ValidationError::UnknownTier {
                field: "outsourcing",
                value: s.to_string(),
            })
    }
}

/// Revenue band used to frame results for the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevenueSegment {
    /// Under $5M revenue
    Startup,
    /// $5M up to $25M revenue
    Growth,
    /// $25M revenue and above
    Enterprise,
}

impl RevenueSegment {
    const STARTUP_CEILING_MILLIONS: f64 = 5.0;
    const GROWTH_CEILING_MILLIONS: f64 = 25.0;

    #[must_use]
    pub fn classify(revenue_millions: f64) -> Self {
        if revenue_millions < Self::STARTUP_CEILING_MILLIONS {
            Self::Startup
        } else if revenue_millions < Self::GROWTH_CEILING_MILLIONS {
            Self::Growth
        } else {
            Self::Enterprise
        }
    }
}

impl fmt::Display for RevenueSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Startup => write!(f, "startup"),
            Self::Growth => write!(f, "growth"),
            Self::Enterprise => write!(f, "enterprise"),
        }
    }
}

/// Validated business profile driving a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputProfile {
    /// Annual revenue in millions
    pub revenue_millions: f64,
    /// Operating expense as a percentage of revenue
    pub opex_percent: f64,
    /// Not used by the math; carried for the caller's records
    #[serde(default)]
    pub headcount: u32,
    /// Technology spend as a percentage of operating expense
    pub tech_spend_percent: f64,
    pub ai_readiness: AiReadinessTier,
    pub process_maturity_percent: f64,
    pub outsourcing: OutsourcingTier,
}

impl Default for InputProfile {
    fn default() -> Self {
        Self {
            revenue_millions: 20.0,
            opex_percent: 35.0,
            headcount: 85,
            tech_spend_percent: 8.0,
            ai_readiness: AiReadinessTier::Beginner,
            process_maturity_percent: 60.0,
            outsourcing: OutsourcingTier::Low,
        }
    }
}

impl InputProfile {
    /// Parse a profile from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, names an unknown tier, or
    /// carries out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let profile: Self = serde_json::from_str(json)
            .map_err(|err| ValidationError::Malformed(err.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Check every domain constraint on the profile.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        finite("revenue_millions", self.revenue_millions)?;
        if self.revenue_millions <= 0.0 {
            return Err(ValidationError::NonPositive {
                field: "revenue_millions",
                value: self.revenue_millions,
            });
        }
        percent("opex_percent", self.opex_percent)?;
        percent("tech_spend_percent", self.tech_spend_percent)?;
        percent("process_maturity_percent", self.process_maturity_percent)?;
        Ok(())
    }

    /// Current operating expense in millions.
    #[must_use]
    pub fn current_opex(&self) -> f64 {
        self.revenue_millions * self.opex_percent / 100.0
    }

    #[must_use]
    pub fn segment(&self) -> RevenueSegment {
        RevenueSegment::classify(self.revenue_millions)
    }

    #[must_use]
    pub fn maturity_multiplier(&self) -> f64 {
        self.process_maturity_percent / 100.0
    }

    /// Tech leverage saturates at 1.2 once spend reaches 12% of OpEx.
    #[must_use]
    pub fn tech_multiplier(&self) -> f64 {
        (self.tech_spend_percent / 10.0).min(1.2)
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite { field })
    }
}

fn percent(field: &'static str, value: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::RangeViolation {
            field,
            min: 0.0,
            max: 100.0,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_valid() {
        let profile = InputProfile::default();
        assert!(profile.validate().is_ok());
        assert!((profile.current_opex() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_out_of_range_opex() {
        let profile = InputProfile {
            opex_percent: 150.0,
            ..InputProfile::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(ValidationError::RangeViolation {
                field: "opex_percent",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_positive_revenue_and_nan() {
        let zero = InputProfile {
            revenue_millions: 0.0,
            ..InputProfile::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(ValidationError::NonPositive { .. })
        ));
        let nan = InputProfile {
            process_maturity_percent: f64::NAN,
            ..InputProfile::default()
        };
        assert_eq!(
            nan.validate(),
            Err(ValidationError::NotFinite {
                field: "process_maturity_percent"
            })
        );
    }

    #[test]
    fn tech_multiplier_caps() {
        let profile = InputProfile {
            tech_spend_percent: 40.0,
            ..InputProfile::default()
        };
        assert!((profile.tech_multiplier() - 1.2).abs() < f64::EPSILON);
        let low = InputProfile {
            tech_spend_percent: 2.0,
            ..InputProfile::default()
        };
        assert!((low.tech_multiplier() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn tiers_parse_case_insensitively() {
        assert_eq!(
            "Adopter".parse::<AiReadinessTier>(),
            Ok(AiReadinessTier::Adopter)
        );
        assert_eq!(" high ".parse::<OutsourcingTier>(), Ok(OutsourcingTier::High));
        assert!(matches!(
            "expert".parse::<AiReadinessTier>(),
            Err(ValidationError::UnknownTier { .. })
        ));
    }

    #[test]
    fn segments_follow_revenue_bands() {
        assert_eq!(RevenueSegment::classify(4.99), RevenueSegment::Startup);
        assert_eq!(RevenueSegment::classify(5.0), RevenueSegment::Growth);
        assert_eq!(RevenueSegment::classify(25.0), RevenueSegment::Enterprise);
    }

    #[test]
    fn profile_from_json_rejects_unknown_tier() {
        let json = r#"{
            "revenue_millions": 10.0,
            "opex_percent": 30.0,
            "tech_spend_percent": 5.0,
            "ai_readiness": "wizard",
            "process_maturity_percent": 50.0,
            "outsourcing": "low"
        }"#;
        assert!(InputProfile::from_json(json).is_err());
        let ok = json.replace("wizard", "learning");
        let profile = InputProfile::from_json(&ok).unwrap();
        assert_eq!(profile.ai_readiness, AiReadinessTier::Learning);
        assert_eq!(profile.headcount, 0);
    }
}
