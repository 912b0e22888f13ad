//! Meridian Venue Router
//!
//! Sits between the pre-trade risk gate and the brokers:
//! - **Venue Selection**: scores every venue supporting the order type
//!   (liquidity, fee, latency) and picks the best
//! - **Order Splitting**: divides a parent order across ratios, routing each child
//! - **Audit Trail**: append-only routing history, written before submission
//! - **Execution**: active-order tracking, cancels and status queries
//!
//! ## Architecture
//!
//! ```text
//! Approved Order ──► ┌──────────────────────────────────────┐
//!                    │            Order Executor            │
//!                    │  validate ─► lifecycle ─► fills      │
//!                    │  ┌────────────────────────────────┐  │
//!                    │  │         Venue Router           │  │
//!                    │  │  catalog ─► score ─► select    │  │
//!                    │  │  history (append-only)         │  │
//!                    │  └───────────────┬────────────────┘  │
//!                    └──────────────────┼───────────────────┘
//!                                       │ submit_order
//!                                       ▼
//!                           Broker (one per venue)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meridian_router::VenueRouter;
//!
//! let mut router = VenueRouter::new(clock);
//! router.register_venue(Venue::new("NYSE", dec!(0.001), dec!(0.9), 5, [OrderType::Market]));
//! router.register_broker("NYSE", Arc::new(my_broker));
//!
//! let result = router.route_order(&order).await?;
//! let children = router.split_order(&order, &[dec!(0.5), dec!(0.3), dec!(0.2)]).await?;
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod result;
pub mod router;

// Re-export main types
pub use config::RouterConfig;
pub use error::{Result, RouterError};
pub use executor::OrderExecutor;
pub use result::{RoutingFailure, RoutingResult};
pub use router::{SPLIT_RATIO_EPSILON, VenueRouter, child_orders};
