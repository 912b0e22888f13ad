//! Meridian Risk Manager
//!
//! Pre-trade risk control for the routing core:
//!
//! - **Risk Limiter**: five ordered admission gates (daily loss, position size,
//!   concentration, order rate, daily trade count) with daily counter rollover
//! - **Leverage**: gross book exposure check on top of the limiter
//! - **Position Sizing**: fixed, volatility-based, Kelly and risk-parity sizing
//! - **Portfolio Metrics**: VaR, Sharpe, drawdown, beta and correlations
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Risk Manager                           │
//! │                                                             │
//! │  TradeRequest ──► RiskLimiter ──► Leverage ──► Evaluation  │
//! │                        ▲                                    │
//! │  Confirmed fills ──────┘ record_trade(pnl)                  │
//! │                                                             │
//! │  Signal ─────────► PositionSizer ──► Suggested size        │
//! │                                                             │
//! │  DataProvider ───► PortfolioRiskManager ──► Metrics        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Limit breaches are reported as a [`RiskVerdict`] / [`TradeEvaluation`], never as
//! an `Err`. Errors are reserved for invalid input and configuration.

pub mod error;
pub mod limiter;
pub mod limits;
pub mod manager;
pub mod portfolio;
pub mod sizing;

// Re-export main types
pub use error::{Result, RiskError};
pub use limiter::{LimitViolation, RiskLimiter, RiskLimiterState, RiskVerdict};
pub use limits::{DayBoundary, TradingLimits};
pub use manager::{RiskManager, TradeEvaluation};
pub use portfolio::{CorrelationMatrix, PortfolioMetrics, PortfolioRiskManager, ReturnSeries};
pub use sizing::{PositionSizer, SizingConfig, SizingMethod};
