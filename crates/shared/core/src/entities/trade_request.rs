use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Order, OrderType, Side};
use crate::values::{Price, Quantity, Symbol, Timestamp};

/// A candidate trade submitted for pre-trade evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: Quantity,
    pub order_type: OrderType,
    pub candidate_price: Price,
}

impl TradeRequest {
    pub fn new(
        symbol: impl Into<Symbol>,
        side: Side,
        quantity: Quantity,
        order_type: OrderType,
        candidate_price: Price,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            order_type,
            candidate_price,
        }
    }

    /// Notional value of the trade (`quantity * candidate_price`); `None` on overflow
    pub fn trade_value(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.candidate_price)
    }

    /// Build the order that would be routed once the trade is approved.
    /// Limit-style orders carry the candidate price as their limit.
    pub fn to_order(&self, timestamp: Timestamp) -> Order {
        let order = Order::new_with_time(
            self.symbol.clone(),
            self.side,
            self.quantity,
            self.order_type,
            timestamp,
        );
        let order = if self.order_type.requires_price() {
            order.with_price(self.candidate_price)
        } else {
            order
        };
        if self.order_type.requires_stop_price() {
            order.with_stop_price(self.candidate_price)
        } else {
            order
        }
    }
}

/// Portfolio state supplied alongside a trade request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub portfolio_value: Decimal,
    /// Current signed exposure (currency units) per symbol
    #[serde(default)]
    pub positions: HashMap<Symbol, Decimal>,
}

impl PortfolioSnapshot {
    pub fn new(portfolio_value: Decimal) -> Self {
        Self {
            portfolio_value,
            positions: HashMap::new(),
        }
    }

    pub fn with_position(mut self, symbol: impl Into<Symbol>, exposure: Decimal) -> Self {
        self.positions.insert(symbol.into(), exposure);
        self
    }
}
