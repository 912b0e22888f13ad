use async_trait::async_trait;
use meridian_core::Order;

use crate::error::BrokerResult;

/// Opaque broker response, passed through routing results unmodified
pub type BrokerOutcome = serde_json::Value;

/// Port for order submission to one venue's broker
///
/// Implementations own their network session; the core only awaits these calls.
/// No deadline is imposed here: callers wrap calls in their own timeout.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Submit an order, returning the broker's raw acknowledgement
    async fn submit_order(&self, order: &Order) -> BrokerResult<BrokerOutcome>;

    /// Cancel an order. `Ok(false)` means the broker refused (e.g. already filled)
    async fn cancel_order(&self, order_id: &str) -> BrokerResult<bool>;

    /// Query the broker's view of an order
    async fn get_order_status(&self, order_id: &str) -> BrokerResult<BrokerOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ensure trait is object-safe
    fn _assert_broker_object_safe(_: &dyn Broker) {}
}
