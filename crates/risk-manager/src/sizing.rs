//! Position Sizing
//!
//! Turns a signal into a currency amount to deploy. The result is advisory: it is
//! not checked against [`TradingLimits`](crate::TradingLimits) here.

use crate::error::{Result, RiskError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Target annualized volatility for volatility-based sizing
const TARGET_VOLATILITY: Decimal = dec!(0.15);
/// Volatility floor so quiet instruments don't get outsized positions
const VOLATILITY_FLOOR: Decimal = dec!(0.05);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingMethod {
    Fixed,
    Kelly,
    RiskParity,
    #[default]
    VolatilityBased,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    pub method: SizingMethod,
    /// Fraction of account value a full-strength signal may deploy
    pub max_position_size: Decimal,
    /// Fraction of account value at risk per trade when a stop is given
    pub risk_per_trade: Decimal,
    /// Average win / average loss, used by Kelly
    pub win_loss_ratio: Decimal,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            method: SizingMethod::VolatilityBased,
            max_position_size: dec!(0.1),
            risk_per_trade: dec!(0.02),
            win_loss_ratio: dec!(1.5),
        }
    }
}

impl SizingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_position_size <= Decimal::ZERO || self.max_position_size > Decimal::ONE {
            return Err(RiskError::InvalidConfig(format!(
                "max_position_size must be in (0, 1], got {}",
                self.max_position_size
            )));
        }
        if self.risk_per_trade <= Decimal::ZERO {
            return Err(RiskError::InvalidConfig(format!(
                "risk_per_trade must be positive, got {}",
                self.risk_per_trade
            )));
        }
        if self.win_loss_ratio <= Decimal::ZERO {
            return Err(RiskError::InvalidConfig(format!(
                "win_loss_ratio must be positive, got {}",
                self.win_loss_ratio
            )));
        }
        Ok(())
    }
}

pub struct PositionSizer {
    config: SizingConfig,
}

impl PositionSizer {
    pub fn new(config: SizingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SizingConfig {
        &self.config
    }

    /// Currency amount to deploy for a signal.
    ///
    /// `signal_strength` is in [0, 1]. For Kelly it is read as the win probability.
    /// A positive `stop_loss_pct` caps the result at
    /// `account_value * risk_per_trade / stop_loss_pct`.
    pub fn calculate_position_size(
        &self,
        account_value: Decimal,
        signal_strength: Decimal,
        volatility: Decimal,
        stop_loss_pct: Option<Decimal>,
    ) -> Result<Decimal> {
        if account_value < Decimal::ZERO {
            return Err(RiskError::InvalidArgument(format!(
                "account_value must be non-negative, got {}",
                account_value
            )));
        }
        if signal_strength < Decimal::ZERO || signal_strength > Decimal::ONE {
            return Err(RiskError::InvalidArgument(format!(
                "signal_strength must be in [0, 1], got {}",
                signal_strength
            )));
        }
        if volatility < Decimal::ZERO {
            return Err(RiskError::InvalidArgument(format!(
                "volatility must be non-negative, got {}",
                volatility
            )));
        }

        let base = account_value * self.config.max_position_size;
        let size = match self.config.method {
            SizingMethod::Fixed => base * signal_strength,
            SizingMethod::VolatilityBased => {
                let scalar = TARGET_VOLATILITY / volatility.max(VOLATILITY_FLOOR);
                base * signal_strength * scalar.min(Decimal::ONE)
            }
            SizingMethod::Kelly => self.kelly(account_value, signal_strength),
            SizingMethod::RiskParity => base,
        };

        Ok(match stop_loss_pct {
            Some(stop) if stop > Decimal::ZERO => {
                size.min(account_value * self.config.risk_per_trade / stop)
            }
            _ => size,
        })
    }

    fn kelly(&self, account_value: Decimal, win_probability: Decimal) -> Decimal {
        if win_probability <= Decimal::ZERO || win_probability >= Decimal::ONE {
            return Decimal::ZERO;
        }
        let b = self.config.win_loss_ratio;
        let kelly_pct = (win_probability * b - (Decimal::ONE - win_probability)) / b;
        let kelly_pct = kelly_pct.clamp(Decimal::ZERO, self.config.max_position_size);
        account_value * kelly_pct
    }
}
