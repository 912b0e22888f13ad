//! Meridian Runner - Trade Pipeline
//!
//! Wires the decision core together from a single JSON config:
//!
//! ```text
//!   TradeRequest + PortfolioSnapshot
//!                 │
//!                 ▼
//!   ┌───────────────────────────┐
//!   │       Risk Manager        │──── rejected ───► PipelineOutcome::Rejected
//!   │  (limiter + leverage)     │
//!   └─────────────┬─────────────┘
//!                 │ approved
//!                 ▼
//!   ┌───────────────────────────┐
//!   │      Order Executor       │
//!   │  (venue router, split)    │──── results ────► PipelineOutcome::Routed
//!   └─────────────┬─────────────┘
//!                 │
//!                 ▼
//!          Broker per venue
//! ```

pub mod config;
pub mod pipeline;

// Re-export main types
pub use config::{ConfigError, SystemConfig};
pub use pipeline::{PipelineError, PipelineOutcome, TradePipeline};
