//! Trade Pipeline
//!
//! Evaluate → route in one call:
//! 1. [`RiskManager`] gates the request against the portfolio snapshot
//! 2. Approved requests become an order (limit-style orders take the candidate price)
//! 3. [`OrderExecutor`] routes it whole, or split when `split_ratios` is configured
//!
//! Nothing is recorded against the daily counters until the caller confirms the
//! execution through [`TradePipeline::confirm_trade`].

use crate::config::SystemConfig;
use log::{info, warn};
use meridian_clock::SystemClock;
use meridian_core::{PortfolioSnapshot, TradeRequest};
use meridian_ports::{Broker, Clock};
use meridian_risk_manager::{RiskError, RiskManager, TradeEvaluation};
use meridian_router::{OrderExecutor, RouterError, RoutingResult, VenueRouter};
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Risk(#[from] RiskError),

    #[error(transparent)]
    Router(#[from] RouterError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// Blocked by pre-trade risk; nothing was routed
    Rejected(TradeEvaluation),
    /// One result per routed order (one, or one per split child)
    Routed(Vec<RoutingResult>),
}

impl PipelineOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, PipelineOutcome::Rejected(_))
    }

    /// True when every order reached a broker
    pub fn fully_routed(&self) -> bool {
        match self {
            PipelineOutcome::Routed(results) => results.iter().all(|r| r.success),
            PipelineOutcome::Rejected(_) => false,
        }
    }
}

pub struct TradePipeline {
    risk: RiskManager,
    executor: OrderExecutor,
    split_ratios: Option<Vec<Decimal>>,
    clock: Arc<dyn Clock>,
}

impl TradePipeline {
    pub fn new(config: SystemConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let risk = RiskManager::new(
            config.limits,
            config.sizing,
            config.risk_free_rate,
            clock.clone(),
        )?;
        let router = VenueRouter::from_config(&config.router, clock.clone())?;
        info!(
            "[PIPELINE] Ready with {} venues{}",
            router.venues().count(),
            if config.split_ratios.is_some() { ", splitting enabled" } else { "" }
        );

        Ok(Self {
            risk,
            executor: OrderExecutor::new(router),
            split_ratios: config.split_ratios,
            clock,
        })
    }

    /// Pipeline on wall-clock time
    pub fn with_system_clock(config: SystemConfig) -> Result<Self> {
        Self::new(config, Arc::new(SystemClock::new()))
    }

    pub fn register_broker(&mut self, venue_name: impl Into<String>, broker: Arc<dyn Broker>) {
        self.executor.router_mut().register_broker(venue_name, broker);
    }

    /// Run pre-trade risk on `request` and route it when approved.
    ///
    /// Unroutable orders come back as failed results inside `Routed`; broker
    /// transport errors propagate.
    pub async fn evaluate_and_route(
        &mut self,
        request: &TradeRequest,
        snapshot: &PortfolioSnapshot,
    ) -> Result<PipelineOutcome> {
        let evaluation = self.risk.evaluate_trade(request, snapshot)?;
        if !evaluation.approved {
            warn!(
                "[PIPELINE] {} {} blocked: {}",
                request.side.as_str(),
                request.symbol,
                evaluation.reason.as_deref().unwrap_or("rejected")
            );
            return Ok(PipelineOutcome::Rejected(evaluation));
        }

        let order = request.to_order(self.clock.now());
        let results = match &self.split_ratios {
            Some(ratios) => self.executor.execute_split(order, ratios).await?,
            None => vec![self.executor.execute_order(order).await?],
        };
        Ok(PipelineOutcome::Routed(results))
    }

    /// Record a confirmed execution against the daily limits
    pub fn confirm_trade(&mut self, pnl: Decimal) {
        self.risk.record_trade(pnl);
    }

    pub fn risk(&self) -> &RiskManager {
        &self.risk
    }

    pub fn risk_mut(&mut self) -> &mut RiskManager {
        &mut self.risk
    }

    pub fn executor(&self) -> &OrderExecutor {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut OrderExecutor {
        &mut self.executor
    }
}
