//! System configuration
//!
//! One JSON document configures the whole pipeline. Every section is optional:
//!
//! ```json
//! {
//!   "limits": { "max_position_size": "0.1", "day_boundary": "utc" },
//!   "sizing": { "method": "kelly" },
//!   "router": { "venues": [ ... ] },
//!   "risk_free_rate": 0.02,
//!   "split_ratios": ["0.6", "0.4"]
//! }
//! ```

use meridian_risk_manager::{SizingConfig, TradingLimits};
use meridian_router::{RouterConfig, SPLIT_RATIO_EPSILON};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

fn default_risk_free_rate() -> f64 {
    0.02
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default)]
    pub limits: TradingLimits,

    #[serde(default)]
    pub sizing: SizingConfig,

    #[serde(default)]
    pub router: RouterConfig,

    /// Annual rate used by portfolio Sharpe
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// When set, approved trades are split across venues in these proportions
    #[serde(default)]
    pub split_ratios: Option<Vec<Decimal>>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            limits: TradingLimits::default(),
            sizing: SizingConfig::default(),
            router: RouterConfig::default(),
            risk_free_rate: default_risk_free_rate(),
            split_ratios: None,
        }
    }
}

impl SystemConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.sizing
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.router
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if !self.risk_free_rate.is_finite() {
            return Err(ConfigError::Invalid(
                "risk_free_rate must be finite".to_string(),
            ));
        }

        if let Some(ratios) = &self.split_ratios {
            if ratios.is_empty() || ratios.iter().any(|r| *r <= Decimal::ZERO) {
                return Err(ConfigError::Invalid(
                    "split_ratios must be non-empty and positive".to_string(),
                ));
            }
            let sum: Decimal = ratios.iter().sum();
            if (sum - Decimal::ONE).abs() > SPLIT_RATIO_EPSILON {
                return Err(ConfigError::Invalid(format!(
                    "split_ratios sum to {}, expected 1",
                    sum
                )));
            }
        }
        Ok(())
    }
}
