//! Order Executor
//!
//! Wraps the [`VenueRouter`] with an active-order book:
//! - Validates orders before routing
//! - Moves orders through their lifecycle (Submitted, Rejected, Cancelled, fills)
//! - Sends cancels and status queries to the venue an order was routed to

use crate::error::{Result, RouterError};
use crate::result::RoutingResult;
use crate::router::{VenueRouter, child_orders};
use log::{info, warn};
use meridian_core::{Order, OrderError, OrderId, OrderStatus, Price, Quantity};
use meridian_ports::BrokerOutcome;
use rust_decimal::Decimal;
use std::collections::HashMap;

pub struct OrderExecutor {
    router: VenueRouter,
    /// Orders handed to a broker and not yet complete
    active_orders: HashMap<OrderId, Order>,
}

impl OrderExecutor {
    pub fn new(router: VenueRouter) -> Self {
        Self {
            router,
            active_orders: HashMap::new(),
        }
    }

    pub fn router(&self) -> &VenueRouter {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut VenueRouter {
        &mut self.router
    }

    /// Validate, route and track an order.
    ///
    /// Only `Pending` orders are accepted. A routed order becomes `Submitted` and is
    /// tracked; an unroutable one becomes `Rejected` and is dropped. Broker errors propagate.
    pub async fn execute_order(&mut self, mut order: Order) -> Result<RoutingResult> {
        ensure_pending(&order)?;
        order.validate()?;

        let result = self.router.route_order(&order).await?;
        if result.success {
            order.transition(OrderStatus::Submitted)?;
            info!(
                "[EXEC] {} submitted to {}",
                order.id,
                result.venue.as_deref().unwrap_or("?")
            );
            self.active_orders.insert(order.id.clone(), order);
        } else {
            order.transition(OrderStatus::Rejected)?;
            warn!(
                "[EXEC] {} rejected: {}",
                order.id,
                result.error_message().unwrap_or_default()
            );
        }
        Ok(result)
    }

    /// Split an order and execute each child in ratio order
    pub async fn execute_split(
        &mut self,
        order: Order,
        ratios: &[Decimal],
    ) -> Result<Vec<RoutingResult>> {
        ensure_pending(&order)?;
        order.validate()?;
        let children = child_orders(&order, ratios)?;

        let mut results = Vec::with_capacity(children.len());
        for child in children {
            results.push(self.execute_order(child).await?);
        }
        Ok(results)
    }

    /// Cancel an active order at the venue it was routed to.
    ///
    /// Returns the broker's answer; the order is only marked `Cancelled` when the
    /// broker confirms.
    pub async fn cancel_order(&mut self, order_id: &str) -> Result<bool> {
        if !self.active_orders.contains_key(order_id) {
            return Err(RouterError::UnknownOrder(order_id.to_string()));
        }
        let venue = self.routed_venue(order_id)?;
        let broker = self
            .router
            .broker(&venue)
            .ok_or_else(|| RouterError::BrokerUnavailable(venue.clone()))?;

        let cancelled = broker.cancel_order(order_id).await?;
        if cancelled {
            if let Some(mut order) = self.active_orders.remove(order_id) {
                order.transition(OrderStatus::Cancelled)?;
                info!("[EXEC] {} cancelled at {}", order_id, venue);
            }
        } else {
            warn!("[EXEC] {} cancel refused by {}", order_id, venue);
        }
        Ok(cancelled)
    }

    /// Ask the order's venue broker for its current status
    pub async fn order_status(&self, order_id: &str) -> Result<BrokerOutcome> {
        let venue = self.routed_venue(order_id)?;
        let broker = self
            .router
            .broker(&venue)
            .ok_or_else(|| RouterError::BrokerUnavailable(venue.clone()))?;
        Ok(broker.get_order_status(order_id).await?)
    }

    /// Apply a fill to an active order; complete orders leave the active book.
    /// Returns the order's resulting status.
    pub fn apply_fill(
        &mut self,
        order_id: &str,
        quantity: Quantity,
        price: Price,
        commission: Decimal,
    ) -> Result<OrderStatus> {
        let order = self
            .active_orders
            .get_mut(order_id)
            .ok_or_else(|| RouterError::UnknownOrder(order_id.to_string()))?;
        order.apply_fill(quantity, price, commission)?;

        let status = order.status;
        if order.is_complete() {
            self.active_orders.remove(order_id);
        }
        Ok(status)
    }

    pub fn active_order(&self, order_id: &str) -> Option<&Order> {
        self.active_orders.get(order_id)
    }

    pub fn active_orders(&self) -> impl Iterator<Item = &Order> {
        self.active_orders.values()
    }

    /// Venue of the most recent routing record for this order
    fn routed_venue(&self, order_id: &str) -> Result<String> {
        self.router
            .history_for(order_id)
            .last()
            .map(|r| r.venue.clone())
            .ok_or_else(|| RouterError::UnknownOrder(order_id.to_string()))
    }
}

/// Orders already handed to a broker must not be submitted again
fn ensure_pending(order: &Order) -> Result<()> {
    if order.status != OrderStatus::Pending {
        return Err(OrderError::IllegalTransition {
            order_id: order.id.clone(),
            from: order.status,
            to: OrderStatus::Submitted,
        }
        .into());
    }
    Ok(())
}
