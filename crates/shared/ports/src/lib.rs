//! Meridian Ports
//!
//! Port definitions (traits) for the Meridian routing and risk core.
//! These define the boundaries between decision logic and infrastructure.

mod broker;
mod clock;
mod data;
mod error;

pub use broker::{Broker, BrokerOutcome};
pub use clock::Clock;
pub use data::{Bar, DataProvider};
pub use error::{BrokerError, BrokerResult, DataError, DataResult};
