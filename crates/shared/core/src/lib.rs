//! Meridian Core Domain
//!
//! Pure domain types for the Meridian routing and risk core.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod error;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    Order, OrderId, OrderStatus, OrderType, PortfolioSnapshot, RoutingRecord, Side, TimeInForce,
    TradeRequest, Venue,
};
pub use error::{OrderError, OrderResult};
pub use values::{Price, Quantity, Symbol, Timestamp};
