//! Job posting plan catalog.

use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Plan prices in rupees.
pub const BASIC_PRICE_INR: i64 = 1999;
pub const PROFESSIONAL_PRICE_INR: i64 = 3499;
pub const ENTERPRISE_PRICE_INR: i64 = 5999;

/// Plan tier for a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobPlanTier {
    #[default]
    Basic,
    Professional,
    Enterprise,
}

/// Error for an unrecognized plan tier string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown plan tier: {0}")]
pub struct PlanTierParseError(String);

impl JobPlanTier {
    /// Get the tier name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobPlanTier::Basic => "basic",
            JobPlanTier::Professional => "professional",
            JobPlanTier::Enterprise => "enterprise",
        }
    }

    /// Price in rupees for this tier.
    pub fn price_inr(&self) -> i64 {
        match self {
            JobPlanTier::Basic => BASIC_PRICE_INR,
            JobPlanTier::Professional => PROFESSIONAL_PRICE_INR,
            JobPlanTier::Enterprise => ENTERPRISE_PRICE_INR,
        }
    }
}

impl std::fmt::Display for JobPlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobPlanTier {
    type Err = PlanTierParseError;

    /// Parse a tier name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(JobPlanTier::Basic),
            "professional" => Ok(JobPlanTier::Professional),
            "enterprise" => Ok(JobPlanTier::Enterprise),
            other => Err(PlanTierParseError(other.to_string())),
        }
    }
}

/// A posting plan as shown on the payment step.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobPlan {
    /// Tier identifier.
    pub tier: JobPlanTier,
    /// Display name.
    pub name: String,
    /// Price in rupees.
    pub price_inr: i64,
    /// Marketing feature list.
    pub features: Vec<String>,
}

impl JobPlan {
    /// Build the plan card for a tier.
    pub fn for_tier(tier: JobPlanTier) -> Self {
        match tier {
            JobPlanTier::Basic => Self {
                tier,
                name: "Basic".to_string(),
                price_inr: BASIC_PRICE_INR,
                features: vec![
                    "30-day job listing".to_string(),
                    "Standard visibility".to_string(),
                    "Email support".to_string(),
                ],
            },
            JobPlanTier::Professional => Self {
                tier,
                name: "Professional".to_string(),
                price_inr: PROFESSIONAL_PRICE_INR,
                features: vec![
                    "45-day job listing".to_string(),
                    "Boosted search placement".to_string(),
                    "Applicant screening questions".to_string(),
                    "Priority support".to_string(),
                ],
            },
            JobPlanTier::Enterprise => Self {
                tier,
                name: "Enterprise".to_string(),
                price_inr: ENTERPRISE_PRICE_INR,
                features: vec![
                    "60-day job listing".to_string(),
                    "Featured placement on the home feed".to_string(),
                    "Applicant screening questions".to_string(),
                    "Dedicated account manager".to_string(),
                    "Branded company page highlight".to_string(),
                ],
            },
        }
    }

    /// The full catalog in display order.
    pub fn catalog() -> Vec<JobPlan> {
        vec![
            JobPlan::for_tier(JobPlanTier::Basic),
            JobPlan::for_tier(JobPlanTier::Professional),
            JobPlan::for_tier(JobPlanTier::Enterprise),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_prices() {
        assert_eq!(JobPlanTier::Basic.price_inr(), 1999);
        assert_eq!(JobPlanTier::Professional.price_inr(), 3499);
        assert_eq!(JobPlanTier::Enterprise.price_inr(), 5999);
    }

    #[test]
    fn test_plan_constants_match_tiers() {
        assert_eq!(BASIC_PRICE_INR, JobPlanTier::Basic.price_inr());
        assert_eq!(PROFESSIONAL_PRICE_INR, JobPlanTier::Professional.price_inr());
        assert_eq!(ENTERPRISE_PRICE_INR, JobPlanTier::Enterprise.price_inr());
    }

    #[test]
    fn test_tier_from_string() {
        assert_eq!("basic".parse(), Ok(JobPlanTier::Basic));
        assert_eq!("professional".parse(), Ok(JobPlanTier::Professional));
        assert_eq!("Enterprise".parse(), Ok(JobPlanTier::Enterprise)); // Mixed case

        let err = "platinum".parse::<JobPlanTier>().unwrap_err();
        assert_eq!(err.to_string(), "unknown plan tier: platinum");
    }

    #[test]
    fn test_catalog_order_and_prices() {
        let catalog = JobPlan::catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog[0].price_inr, 1999);
        assert_eq!(catalog[1].price_inr, 3499);
        assert_eq!(catalog[2].price_inr, 5999);
        // Prices ascend through the catalog
        assert!(catalog.windows(2).all(|w| w[0].price_inr < w[1].price_inr));
    }

    #[test]
    fn test_plan_cards_have_features() {
        for plan in JobPlan::catalog() {
            assert!(!plan.features.is_empty());
            assert!(!plan.name.is_empty());
        }
    }
}
