//! Venue Router
//!
//! Scores registered venues for an order, routes it to the best one through that
//! venue's broker, and keeps an append-only audit trail of every routing decision.

use crate::config::RouterConfig;
use crate::error::{Result, RouterError};
use crate::result::{RoutingFailure, RoutingResult};
use indexmap::IndexMap;
use log::{debug, info, warn};
use meridian_core::{Order, RoutingRecord, Venue};
use meridian_ports::{Broker, Clock};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;

/// Allowed distance of the split ratio sum from 1.0
pub const SPLIT_RATIO_EPSILON: Decimal = dec!(0.000000001);

/// Build the child orders for a split: ids `{parent}_{i}`, quantity `parent * ratio`.
///
/// Ratios must be positive and sum to 1 within [`SPLIT_RATIO_EPSILON`].
pub fn child_orders(parent: &Order, ratios: &[Decimal]) -> Result<Vec<Order>> {
    if ratios.is_empty() {
        return Err(RouterError::InvalidArgument(
            "Split ratios must not be empty".to_string(),
        ));
    }
    if let Some(bad) = ratios.iter().find(|r| **r <= Decimal::ZERO) {
        return Err(RouterError::InvalidArgument(format!(
            "Split ratio {} must be positive",
            bad
        )));
    }
    let total: Decimal = ratios.iter().sum();
    if (total - Decimal::ONE).abs() > SPLIT_RATIO_EPSILON {
        return Err(RouterError::InvalidArgument(format!(
            "Split ratios must sum to 1.0, got {}",
            total
        )));
    }

    Ok(ratios
        .iter()
        .enumerate()
        .map(|(i, ratio)| {
            let mut child = parent.clone();
            child.id = format!("{}_{}", parent.id, i);
            child.quantity = parent.quantity * ratio;
            child
        })
        .collect())
}

/// Routes orders to the best-scoring venue
///
/// Not internally synchronized: mutation goes through `&mut self`, so hosts sharing a
/// router across tasks must wrap it themselves (one router per portfolio pipeline).
pub struct VenueRouter {
    /// Venue catalog; iteration follows registration order, which is the score tie-break
    venues: IndexMap<String, Venue>,
    /// Broker handle per venue name
    brokers: HashMap<String, Arc<dyn Broker>>,
    /// Append-only audit trail
    routing_history: Vec<RoutingRecord>,
    clock: Arc<dyn Clock>,
}

impl VenueRouter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            venues: IndexMap::new(),
            brokers: HashMap::new(),
            routing_history: Vec::new(),
            clock,
        }
    }

    /// Create a router with the venues from a validated config (brokers are registered separately)
    pub fn from_config(config: &RouterConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let mut router = Self::new(clock);
        for venue in &config.venues {
            router.register_venue(venue.clone());
        }
        Ok(router)
    }

    /// Register a venue, replacing any venue with the same name.
    /// A replacement keeps the original catalog position.
    pub fn register_venue(&mut self, venue: Venue) -> Option<Venue> {
        info!(
            "[ROUTER] Venue {} registered (fee={}, liquidity={}, latency={}ms)",
            venue.name, venue.fee_rate, venue.liquidity_score, venue.latency_ms
        );
        self.venues.insert(venue.name.clone(), venue)
    }

    /// Remove a venue from the catalog; its broker handle stays registered
    pub fn remove_venue(&mut self, name: &str) -> Option<Venue> {
        self.venues.shift_remove(name)
    }

    /// Attach the broker used to submit orders routed to `venue_name`
    pub fn register_broker(&mut self, venue_name: impl Into<String>, broker: Arc<dyn Broker>) {
        let venue_name = venue_name.into();
        debug!("[ROUTER] Broker registered for {}", venue_name);
        self.brokers.insert(venue_name, broker);
    }

    pub fn venue(&self, name: &str) -> Option<&Venue> {
        self.venues.get(name)
    }

    /// Venues in catalog order
    pub fn venues(&self) -> impl Iterator<Item = &Venue> {
        self.venues.values()
    }

    pub fn broker(&self, venue_name: &str) -> Option<Arc<dyn Broker>> {
        self.brokers.get(venue_name).cloned()
    }

    /// Score every venue that supports the order's type, in catalog order
    pub fn venue_scores(&self, order: &Order) -> Vec<(&Venue, Decimal)> {
        self.venues
            .values()
            .filter(|v| v.supports(order.order_type))
            .map(|v| (v, v.score()))
            .collect()
    }

    /// Pick the highest-scoring eligible venue. On equal scores the venue registered
    /// first wins. Returns `None` when no venue supports the order type.
    pub fn select_venue(&self, order: &Order) -> Option<&Venue> {
        let mut best: Option<(&Venue, Decimal)> = None;
        for (venue, score) in self.venue_scores(order) {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((venue, score)),
            }
        }
        best.map(|(venue, _)| venue)
    }

    /// Route an order to the best venue and submit it through that venue's broker.
    ///
    /// The routing record is appended *before* submission, so a broker error leaves
    /// the intent in the audit trail. Broker errors propagate as `Err`.
    pub async fn route_order(&mut self, order: &Order) -> Result<RoutingResult> {
        let venue_name = match self.select_venue(order) {
            Some(venue) => venue.name.clone(),
            None => {
                warn!(
                    "[ROUTER] No venue supports {} for order {}",
                    order.order_type.as_str(),
                    order.id
                );
                return Ok(RoutingResult::failed(
                    order.id.clone(),
                    RoutingFailure::NoEligibleVenue,
                ));
            }
        };

        let Some(broker) = self.broker(&venue_name) else {
            warn!(
                "[ROUTER] Venue {} selected for {} but no broker is registered",
                venue_name, order.id
            );
            return Ok(RoutingResult::failed(
                order.id.clone(),
                RoutingFailure::BrokerUnavailable { venue: venue_name },
            ));
        };

        self.routing_history.push(RoutingRecord {
            order_id: order.id.clone(),
            venue: venue_name.clone(),
            timestamp: self.clock.now(),
            order_type: order.order_type,
            quantity: order.quantity,
        });

        info!(
            "[ROUTER] {} {} {} {} -> {}",
            order.id,
            order.side.as_str(),
            order.quantity,
            order.symbol,
            venue_name
        );

        let outcome = broker.submit_order(order).await?;
        Ok(RoutingResult::routed(order.id.clone(), venue_name, outcome))
    }

    /// Split an order by `ratios` and route each child in ratio order.
    ///
    /// A child that cannot be routed yields a failed result and the loop continues;
    /// inspect every result to detect partial execution. A broker error aborts the
    /// remaining children.
    pub async fn split_order(
        &mut self,
        order: &Order,
        ratios: &[Decimal],
    ) -> Result<Vec<RoutingResult>> {
        let children = child_orders(order, ratios)?;
        debug!(
            "[ROUTER] Splitting {} into {} children",
            order.id,
            children.len()
        );

        let mut results = Vec::with_capacity(children.len());
        for child in &children {
            results.push(self.route_order(child).await?);
        }

        let routed = results.iter().filter(|r| r.success).count();
        if routed < results.len() {
            warn!(
                "[ROUTER] Split of {} partially routed: {}/{}",
                order.id,
                routed,
                results.len()
            );
        }
        Ok(results)
    }

    /// Full audit trail, oldest first
    pub fn routing_history(&self) -> &[RoutingRecord] {
        &self.routing_history
    }

    /// Records for one order id, oldest first
    pub fn history_for<'a>(&'a self, order_id: &'a str) -> impl Iterator<Item = &'a RoutingRecord> {
        self.routing_history
            .iter()
            .filter(move |r| r.order_id == order_id)
    }
}
