//! Trading Limits
//!
//! Immutable configuration for the [`RiskLimiter`](crate::RiskLimiter). Every field
//! has a default, so `{}` is a valid JSON config.

use crate::error::{Result, RiskError};
use chrono::{Local, NaiveDate};
use meridian_core::Timestamp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Calendar used to decide when the daily counters roll over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayBoundary {
    /// Host local wall-clock date. Shifts with the host timezone and DST.
    #[default]
    Local,
    /// UTC date; stable across hosts
    Utc,
}

impl DayBoundary {
    /// Calendar date of `ts` under this boundary
    pub fn date_of(&self, ts: Timestamp) -> NaiveDate {
        match self {
            DayBoundary::Local => ts.with_timezone(&Local).date_naive(),
            DayBoundary::Utc => ts.date_naive(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingLimits {
    /// Daily loss as a fraction of portfolio value
    pub max_daily_loss: Decimal,
    /// Single trade value as a fraction of portfolio value
    pub max_position_size: Decimal,
    /// Gross exposure over portfolio value
    pub max_leverage: Decimal,
    pub max_orders_per_minute: u32,
    pub max_daily_trades: u32,
    /// Single-symbol exposure as a fraction of portfolio value
    pub concentration_limit: Decimal,
    pub day_boundary: DayBoundary,
}

impl Default for TradingLimits {
    fn default() -> Self {
        Self {
            max_daily_loss: dec!(0.02),
            max_position_size: dec!(0.1),
            max_leverage: dec!(1.0),
            max_orders_per_minute: 10,
            max_daily_trades: 100,
            concentration_limit: dec!(0.25),
            day_boundary: DayBoundary::Local,
        }
    }
}

impl TradingLimits {
    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("max_daily_loss", self.max_daily_loss),
            ("max_position_size", self.max_position_size),
            ("concentration_limit", self.concentration_limit),
            ("max_leverage", self.max_leverage),
        ];
        for (name, value) in fractions {
            if value <= Decimal::ZERO {
                return Err(RiskError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.max_orders_per_minute == 0 || self.max_daily_trades == 0 {
            return Err(RiskError::InvalidConfig(
                "order and trade counts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
