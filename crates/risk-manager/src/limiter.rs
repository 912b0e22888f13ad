//! Risk Limiter
//!
//! Pre-trade admission gate. Evaluates five gates in a fixed order and reports the
//! first one violated:
//!
//! 1. Daily loss
//! 2. Position size
//! 3. Symbol concentration
//! 4. Order rate (trailing 60 seconds)
//! 5. Daily trade count
//!
//! Rolling counters are reset when the calendar date (see
//! [`DayBoundary`](crate::DayBoundary)) moves past the last reset.

use crate::error::Result;
use crate::limits::TradingLimits;
use chrono::Duration;
use log::{debug, info, warn};
use meridian_core::Timestamp;
use meridian_ports::Clock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use thiserror::Error;

/// Width of the order-rate window
const RATE_WINDOW_SECS: i64 = 60;

/// The limit a rejected trade ran into
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitViolation {
    #[error("Portfolio value must be positive")]
    NonPositivePortfolio,

    #[error("Daily loss limit reached")]
    DailyLoss,

    /// `position_pct` is in percent, rounded to one place (15.67% reads 15.7)
    #[error("Position size {position_pct:.1}% exceeds limit")]
    PositionSize { position_pct: Decimal },

    #[error("Concentration limit exceeded for {symbol}")]
    Concentration { symbol: String },

    #[error("Order rate limit exceeded")]
    OrderRate,

    #[error("Daily trade limit reached")]
    DailyTrades,

    #[error("Leverage {leverage:.2}x exceeds limit")]
    Leverage { leverage: Decimal },

    #[error("Trade value out of range")]
    ValueOutOfRange,
}

/// Admission verdict for a proposed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub approved: bool,
    /// Human-readable rejection reason
    pub reason: Option<String>,
    pub violation: Option<LimitViolation>,
}

impl RiskVerdict {
    pub fn approve() -> Self {
        Self {
            approved: true,
            reason: None,
            violation: None,
        }
    }

    pub fn reject(violation: LimitViolation) -> Self {
        Self {
            approved: false,
            reason: Some(violation.to_string()),
            violation: Some(violation),
        }
    }
}

/// Rolling daily counters, owned by the limiter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLimiterState {
    /// Cumulative realized PnL since the last reset (negative = loss)
    pub daily_pnl: Decimal,
    pub daily_trades: u32,
    pub last_reset: Timestamp,
    /// Completion times of recorded trades, oldest first
    pub order_timestamps: VecDeque<Timestamp>,
}

impl RiskLimiterState {
    fn fresh(now: Timestamp) -> Self {
        Self {
            daily_pnl: Decimal::ZERO,
            daily_trades: 0,
            last_reset: now,
            order_timestamps: VecDeque::new(),
        }
    }
}

/// Enforces [`TradingLimits`] against a single portfolio
///
/// Not internally synchronized; one limiter per evaluation pipeline.
pub struct RiskLimiter {
    limits: TradingLimits,
    state: RiskLimiterState,
    clock: Arc<dyn Clock>,
}

impl RiskLimiter {
    pub fn new(limits: TradingLimits, clock: Arc<dyn Clock>) -> Result<Self> {
        limits.validate()?;
        let state = RiskLimiterState::fresh(clock.now());
        Ok(Self {
            limits,
            state,
            clock,
        })
    }

    pub fn limits(&self) -> &TradingLimits {
        &self.limits
    }

    pub fn state(&self) -> &RiskLimiterState {
        &self.state
    }

    /// Decide whether a trade of `trade_value` may proceed.
    ///
    /// `current_positions` holds signed exposure per symbol in currency units.
    pub fn check_trade_allowed(
        &mut self,
        trade_value: Decimal,
        portfolio_value: Decimal,
        symbol: &str,
        current_positions: &HashMap<String, Decimal>,
    ) -> RiskVerdict {
        let now = self.clock.now();
        self.reset_daily_counters_if_needed(now);

        match self.first_violation(trade_value, portfolio_value, symbol, current_positions, now) {
            Some(violation) => {
                warn!("[RISK REJECTED] {} {}: {}", symbol, trade_value, violation);
                RiskVerdict::reject(violation)
            }
            None => {
                debug!("[RISK] {} {} approved", symbol, trade_value);
                RiskVerdict::approve()
            }
        }
    }

    fn first_violation(
        &self,
        trade_value: Decimal,
        portfolio_value: Decimal,
        symbol: &str,
        current_positions: &HashMap<String, Decimal>,
        now: Timestamp,
    ) -> Option<LimitViolation> {
        if portfolio_value <= Decimal::ZERO {
            return Some(LimitViolation::NonPositivePortfolio);
        }

        // Any overflow below means the inputs are far outside what the limits can express
        let Some(violation) = self.value_violation(trade_value, portfolio_value, symbol, current_positions)
        else {
            return Some(LimitViolation::ValueOutOfRange);
        };
        if violation.is_some() {
            return violation;
        }

        // 4. Order rate
        if self.recent_order_count(now) >= self.limits.max_orders_per_minute as usize {
            return Some(LimitViolation::OrderRate);
        }

        // 5. Daily trade count
        if self.state.daily_trades >= self.limits.max_daily_trades {
            return Some(LimitViolation::DailyTrades);
        }

        None
    }

    /// Gates 1-3. Outer `None` when the arithmetic overflows.
    fn value_violation(
        &self,
        trade_value: Decimal,
        portfolio_value: Decimal,
        symbol: &str,
        current_positions: &HashMap<String, Decimal>,
    ) -> Option<Option<LimitViolation>> {
        // 1. Daily loss (inclusive)
        let loss_limit = self.limits.max_daily_loss.checked_mul(portfolio_value)?;
        if self.state.daily_pnl.abs() >= loss_limit {
            return Some(Some(LimitViolation::DailyLoss));
        }

        // 2. Position size
        let position_pct = trade_value.checked_div(portfolio_value)?;
        if position_pct > self.limits.max_position_size {
            let position_pct = position_pct
                .checked_mul(Decimal::ONE_HUNDRED)?
                .round_dp(1);
            return Some(Some(LimitViolation::PositionSize { position_pct }));
        }

        // 3. Concentration (exclusive)
        let exposure = current_positions
            .get(symbol)
            .copied()
            .unwrap_or(Decimal::ZERO)
            .checked_add(trade_value)?;
        if exposure.abs().checked_div(portfolio_value)? > self.limits.concentration_limit {
            return Some(Some(LimitViolation::Concentration {
                symbol: symbol.to_string(),
            }));
        }

        Some(None)
    }

    /// Record a completed trade. Call only once execution is confirmed.
    pub fn record_trade(&mut self, pnl: Decimal) {
        let now = self.clock.now();
        self.reset_daily_counters_if_needed(now);

        self.state.daily_pnl = self.state.daily_pnl.saturating_add(pnl);
        self.state.daily_trades = self.state.daily_trades.saturating_add(1);
        self.state.order_timestamps.push_back(now);
        self.prune_rate_window(now);

        debug!(
            "[RISK] Trade recorded: pnl={}, daily_pnl={}, trades={}",
            pnl, self.state.daily_pnl, self.state.daily_trades
        );
    }

    /// Number of recorded trades strictly inside the trailing window
    pub fn recent_order_count(&self, now: Timestamp) -> usize {
        let window = Duration::seconds(RATE_WINDOW_SECS);
        self.state
            .order_timestamps
            .iter()
            .filter(|ts| now - **ts < window)
            .count()
    }

    fn prune_rate_window(&mut self, now: Timestamp) {
        let window = Duration::seconds(RATE_WINDOW_SECS);
        while let Some(oldest) = self.state.order_timestamps.front() {
            if now - *oldest >= window {
                self.state.order_timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    fn reset_daily_counters_if_needed(&mut self, now: Timestamp) {
        let boundary = self.limits.day_boundary;
        if boundary.date_of(now) > boundary.date_of(self.state.last_reset) {
            info!(
                "[RISK] Daily reset: PnL was {}, trades {}",
                self.state.daily_pnl, self.state.daily_trades
            );
            self.state = RiskLimiterState::fresh(now);
        }
    }
}
