//! Router errors
//!
//! Routing *decisions* that fail (no venue, no broker) are not errors: they come back
//! as a failed [`RoutingResult`](crate::RoutingResult). These variants cover bad input
//! and faults raised by the broker itself.

use meridian_core::OrderError;
use meridian_ports::BrokerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid router config: {0}")]
    InvalidConfig(String),

    #[error("Unknown order: {0}")]
    UnknownOrder(String),

    #[error("Broker not available for {0}")]
    BrokerUnavailable(String),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),
}

pub type Result<T> = std::result::Result<T, RouterError>;
