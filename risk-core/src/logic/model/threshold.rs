//! Decision Policy - probability of default → risk tier
//!
//! Two fixed cut-offs split [0, 1] into three tiers. Comparisons are strict
//! greater-than, so a boundary value always lands in the lower-severity tier.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_THRESHOLD_HIGH, DEFAULT_THRESHOLD_MEDIUM};

// ============================================================================
// RISK TIER
// ============================================================================

/// Business-facing outcome of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    /// Approve
    Low,
    /// Route to manual review
    Medium,
    /// Reject
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }

    pub fn decision(&self) -> Decision {
        match self {
            RiskTier::Low => Decision::Approve,
            RiskTier::Medium => Decision::ManualReview,
            RiskTier::High => Decision::Reject,
        }
    }

    /// Operator-facing banner text
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk – Loan Approved",
            RiskTier::Medium => "Medium Risk – Manual Review",
            RiskTier::High => "High Risk – Loan Rejected",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskTier::Low => "#10b981",    // Green
            RiskTier::Medium => "#f59e0b", // Yellow
            RiskTier::High => "#ef4444",   // Red
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action attached to a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    ManualReview,
    Reject,
}

// ============================================================================
// THRESHOLD CONFIG
// ============================================================================

/// Threshold Configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// `p > high` → HIGH
    pub high: f64,

    /// `medium < p <= high` → MEDIUM, `p <= medium` → LOW
    pub medium: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            high: DEFAULT_THRESHOLD_HIGH,
            medium: DEFAULT_THRESHOLD_MEDIUM,
        }
    }
}

impl ThresholdConfig {
    /// Build a policy, requiring `0 <= medium < high <= 1`
    pub fn new(high: f64, medium: f64) -> Result<Self, String> {
        let config = Self { high, medium };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.medium) || !(0.0..=1.0).contains(&self.high) {
            return Err(format!(
                "thresholds must lie in [0, 1] (high = {}, medium = {})",
                self.high, self.medium
            ));
        }
        if self.medium >= self.high {
            return Err(format!(
                "medium threshold {} must be below high threshold {}",
                self.medium, self.high
            ));
        }
        Ok(())
    }

    /// Map a probability of default to its tier
    pub fn decide(&self, p: f64) -> RiskTier {
        if p > self.high {
            RiskTier::High
        } else if p > self.medium {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

/// Decide with the production thresholds (0.60 / 0.35)
pub fn decide(p: f64) -> RiskTier {
    ThresholdConfig::default().decide(p)
}
