use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::{OrderStatus, OrderType, Side, TimeInForce};
use crate::error::{OrderError, OrderResult};
use crate::values::{Price, Quantity, Symbol};

/// Unique identifier for an order
///
/// String rather than Uuid: split children derive `{parent}_{index}` ids.
pub type OrderId = String;

/// Full order details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: Quantity,
    pub order_type: OrderType,
    /// Required for Limit and StopLimit orders
    pub price: Option<Price>,
    /// Required for Stop, StopLimit and TrailingStop orders
    pub stop_price: Option<Price>,
    pub time_in_force: TimeInForce,
    pub status: OrderStatus,
    pub filled_quantity: Quantity,
    pub average_price: Option<Price>,
    pub commission: Decimal,
    pub created_at: DateTime<Utc>,
    /// Free-form caller data, carried through routing untouched
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Order {
    /// Create a new pending order with explicit timestamp
    pub fn new_with_time(
        symbol: impl Into<Symbol>,
        side: Side,
        quantity: Quantity,
        order_type: OrderType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            symbol: symbol.into(),
            side,
            quantity,
            order_type,
            price: None,
            stop_price: None,
            time_in_force: TimeInForce::default(),
            status: OrderStatus::Pending,
            filled_quantity: Decimal::ZERO,
            average_price: None,
            commission: Decimal::ZERO,
            created_at: timestamp,
            metadata: HashMap::new(),
        }
    }

    /// Create a new order using current system time
    /// Note: in tests, prefer `new_with_time` with clock-provided time
    pub fn new(symbol: impl Into<Symbol>, side: Side, quantity: Quantity, order_type: OrderType) -> Self {
        Self::new_with_time(symbol, side, quantity, order_type, Utc::now())
    }

    pub fn with_id(mut self, id: impl Into<OrderId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stop_price(mut self, stop_price: Price) -> Self {
        self.stop_price = Some(stop_price);
        self
    }

    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = time_in_force;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Validate field constraints and order type requirements
    pub fn validate(&self) -> OrderResult<()> {
        if self.quantity <= Decimal::ZERO {
            return Err(self.invalid(format!("quantity must be positive, got {}", self.quantity)));
        }
        if let Some(price) = self.price {
            if price <= Decimal::ZERO {
                return Err(self.invalid(format!("price must be positive, got {}", price)));
            }
        }
        if let Some(stop) = self.stop_price {
            if stop <= Decimal::ZERO {
                return Err(self.invalid(format!("stop price must be positive, got {}", stop)));
            }
        }
        if self.order_type.requires_price() && self.price.is_none() {
            return Err(self.invalid(format!("{} order requires a price", self.order_type.as_str())));
        }
        if self.order_type.requires_stop_price() && self.stop_price.is_none() {
            return Err(self.invalid(format!(
                "{} order requires a stop price",
                self.order_type.as_str()
            )));
        }
        if self.filled_quantity > self.quantity {
            return Err(self.invalid("filled quantity exceeds order quantity".to_string()));
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> OrderError {
        OrderError::Invalid {
            order_id: self.id.clone(),
            reason,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_complete(&self) -> bool {
        self.status.is_terminal()
    }

    /// Filled share of the order in percent (0-100)
    pub fn fill_percentage(&self) -> Decimal {
        if self.quantity.is_zero() {
            return Decimal::ZERO;
        }
        self.filled_quantity / self.quantity * Decimal::ONE_HUNDRED
    }

    /// Returns remaining quantity to be filled
    pub fn remaining_quantity(&self) -> Quantity {
        self.quantity - self.filled_quantity
    }

    /// Move the order to `next`, refusing backwards or out-of-terminal moves
    pub fn transition(&mut self, next: OrderStatus) -> OrderResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(OrderError::IllegalTransition {
                order_id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Apply an execution report: updates the VWAP average price, commission and status
    pub fn apply_fill(
        &mut self,
        quantity: Quantity,
        price: Price,
        commission: Decimal,
    ) -> OrderResult<()> {
        if quantity <= Decimal::ZERO || price <= Decimal::ZERO {
            return Err(self.invalid(format!("bad fill {} @ {}", quantity, price)));
        }
        let remaining = self.remaining_quantity();
        if quantity > remaining {
            return Err(OrderError::Overfill {
                order_id: self.id.clone(),
                fill: quantity.to_string(),
                remaining: remaining.to_string(),
            });
        }

        let next = if quantity == remaining {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };
        self.transition(next)?;

        let prior_notional = self.average_price.unwrap_or(Decimal::ZERO) * self.filled_quantity;
        self.filled_quantity += quantity;
        self.average_price = Some((prior_notional + quantity * price) / self.filled_quantity);
        self.commission += commission;
        Ok(())
    }
}
