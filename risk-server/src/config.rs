//! Configuration module

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use credit_risk_core::constants::{
    DEFAULT_ARTIFACT_DIR, DEFAULT_MAX_DISPLAY, DEFAULT_THRESHOLD_HIGH, DEFAULT_THRESHOLD_MEDIUM,
};
use credit_risk_core::{ScoringConfig, ThresholdConfig};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Directory holding preprocessor, model and feature names
    pub artifact_dir: PathBuf,

    /// Decision policy
    pub thresholds: ThresholdConfig,

    /// Waterfall rows before folding
    pub max_display: usize,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: parse_var(&lookup, "PORT").unwrap_or(8080),

            artifact_dir: lookup("ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_DIR)),

            thresholds: ThresholdConfig {
                high: parse_var(&lookup, "RISK_THRESHOLD_HIGH").unwrap_or(DEFAULT_THRESHOLD_HIGH),
                medium: parse_var(&lookup, "RISK_THRESHOLD_MEDIUM").unwrap_or(DEFAULT_THRESHOLD_MEDIUM),
            },

            max_display: parse_var(&lookup, "EXPLAIN_MAX_DISPLAY")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(DEFAULT_MAX_DISPLAY),

            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Reject settings the scoring engine cannot run with
    pub fn validate(&self) -> Result<(), String> {
        self.thresholds.validate()
    }

    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig {
            thresholds: self.thresholds,
            max_display: self.max_display,
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Unset or unparseable variables fall back to the default
fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}
