//! Risk Manager
//!
//! Coordinates the pre-trade side of the risk core:
//! - Runs the [`RiskLimiter`] gates on each trade request
//! - Adds a gross leverage check across the whole book
//! - Exposes position sizing and portfolio metrics

use crate::error::{Result, RiskError};
use crate::limiter::{LimitViolation, RiskLimiter, RiskVerdict};
use crate::limits::TradingLimits;
use crate::portfolio::{PortfolioMetrics, PortfolioRiskManager};
use crate::sizing::{PositionSizer, SizingConfig};
use log::{info, warn};
use meridian_core::{PortfolioSnapshot, Quantity, TradeRequest};
use meridian_ports::Clock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of [`RiskManager::evaluate_trade`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvaluation {
    pub approved: bool,
    pub reason: Option<String>,
    pub violation: Option<LimitViolation>,
    /// Quantity cleared for routing; zero when rejected
    pub adjusted_quantity: Quantity,
    /// Unsigned notional that was checked (`quantity * candidate_price`)
    pub trade_value: Decimal,
}

impl TradeEvaluation {
    fn from_verdict(verdict: RiskVerdict, request: &TradeRequest, trade_value: Decimal) -> Self {
        let adjusted_quantity = if verdict.approved {
            request.quantity
        } else {
            Decimal::ZERO
        };
        Self {
            approved: verdict.approved,
            reason: verdict.reason,
            violation: verdict.violation,
            adjusted_quantity,
            trade_value,
        }
    }

    /// The limiter-level verdict this evaluation carries
    pub fn verdict(&self) -> RiskVerdict {
        RiskVerdict {
            approved: self.approved,
            reason: self.reason.clone(),
            violation: self.violation.clone(),
        }
    }
}

pub struct RiskManager {
    limiter: RiskLimiter,
    sizer: PositionSizer,
    portfolio: PortfolioRiskManager,
}

impl RiskManager {
    pub fn new(
        limits: TradingLimits,
        sizing: SizingConfig,
        risk_free_rate: f64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        Ok(Self {
            limiter: RiskLimiter::new(limits, clock)?,
            sizer: PositionSizer::new(sizing)?,
            portfolio: PortfolioRiskManager::new(risk_free_rate),
        })
    }

    /// Run all pre-trade checks for `request` against `snapshot`.
    ///
    /// Rejects with a `Leverage` violation when the limiter passes but gross
    /// exposure including this trade exceeds `max_leverage`.
    pub fn evaluate_trade(
        &mut self,
        request: &TradeRequest,
        snapshot: &PortfolioSnapshot,
    ) -> Result<TradeEvaluation> {
        let trade_value = request.trade_value().ok_or_else(|| {
            RiskError::InvalidArgument(format!(
                "trade value of {} x {} overflows",
                request.quantity, request.candidate_price
            ))
        })?;
        let verdict = self.limiter.check_trade_allowed(
            trade_value,
            snapshot.portfolio_value,
            &request.symbol,
            &snapshot.positions,
        );

        let verdict = if verdict.approved {
            self.check_leverage(trade_value, snapshot)
        } else {
            verdict
        };

        if verdict.approved {
            info!(
                "[RISK] Approved {} {} {} @ {} (value {})",
                request.side.as_str(),
                request.quantity,
                request.symbol,
                request.candidate_price,
                trade_value
            );
        }
        Ok(TradeEvaluation::from_verdict(verdict, request, trade_value))
    }

    fn check_leverage(&self, trade_value: Decimal, snapshot: &PortfolioSnapshot) -> RiskVerdict {
        let leverage = snapshot
            .positions
            .values()
            .try_fold(trade_value, |acc, v| acc.checked_add(v.abs()))
            .and_then(|gross| gross.checked_div(snapshot.portfolio_value));
        let Some(leverage) = leverage else {
            warn!("[RISK REJECTED] gross exposure overflows");
            return RiskVerdict::reject(LimitViolation::ValueOutOfRange);
        };
        if leverage > self.limiter.limits().max_leverage {
            let violation = LimitViolation::Leverage { leverage };
            warn!("[RISK REJECTED] {}", violation);
            return RiskVerdict::reject(violation);
        }
        RiskVerdict::approve()
    }

    /// Record a confirmed execution with its realized PnL
    pub fn record_trade(&mut self, pnl: Decimal) {
        self.limiter.record_trade(pnl);
    }

    /// Suggested currency amount for a signal; see [`PositionSizer`]
    pub fn position_size(
        &self,
        account_value: Decimal,
        signal_strength: Decimal,
        volatility: Decimal,
        stop_loss_pct: Option<Decimal>,
    ) -> Result<Decimal> {
        self.sizer
            .calculate_position_size(account_value, signal_strength, volatility, stop_loss_pct)
    }

    pub fn portfolio_metrics(&self) -> Result<PortfolioMetrics> {
        self.portfolio.metrics()
    }

    pub fn limiter(&self) -> &RiskLimiter {
        &self.limiter
    }

    pub fn sizer(&self) -> &PositionSizer {
        &self.sizer
    }

    pub fn portfolio(&self) -> &PortfolioRiskManager {
        &self.portfolio
    }

    pub fn portfolio_mut(&mut self) -> &mut PortfolioRiskManager {
        &mut self.portfolio
    }
}
