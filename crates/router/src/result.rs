//! Routing result types

use meridian_core::OrderId;
use meridian_ports::BrokerOutcome;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a routing attempt produced no submission
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingFailure {
    /// No registered venue supports the order type
    #[error("No suitable venue found")]
    NoEligibleVenue,

    /// A venue was selected but no broker handle is registered for it
    #[error("Broker not available for {venue}")]
    BrokerUnavailable { venue: String },
}

/// Outcome of routing one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingResult {
    pub order_id: OrderId,
    pub success: bool,
    pub venue: Option<String>,
    /// Broker acknowledgement, untouched
    pub result: Option<BrokerOutcome>,
    pub error: Option<RoutingFailure>,
}

impl RoutingResult {
    pub fn routed(order_id: impl Into<OrderId>, venue: impl Into<String>, result: BrokerOutcome) -> Self {
        Self {
            order_id: order_id.into(),
            success: true,
            venue: Some(venue.into()),
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(order_id: impl Into<OrderId>, failure: RoutingFailure) -> Self {
        Self {
            order_id: order_id.into(),
            success: false,
            venue: None,
            result: None,
            error: Some(failure),
        }
    }

    /// Human-readable failure reason, if any
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}
