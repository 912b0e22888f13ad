use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::OrderType;

/// Score weights for venue selection
const LIQUIDITY_WEIGHT: Decimal = dec!(0.4);
const FEE_WEIGHT: Decimal = dec!(0.3);
const LATENCY_WEIGHT: Decimal = dec!(0.3);

/// An execution destination (exchange/ECN)
///
/// Immutable once registered with a router; build a new `Venue` to change terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    /// Fee as a fraction of notional (0.001 = 10 bps)
    pub fee_rate: Decimal,
    /// Unitless, higher is better
    pub liquidity_score: Decimal,
    pub latency_ms: u64,
    pub supported_order_types: HashSet<OrderType>,
}

impl Venue {
    pub fn new(
        name: impl Into<String>,
        fee_rate: Decimal,
        liquidity_score: Decimal,
        latency_ms: u64,
        supported_order_types: impl IntoIterator<Item = OrderType>,
    ) -> Self {
        Self {
            name: name.into(),
            fee_rate,
            liquidity_score,
            latency_ms,
            supported_order_types: supported_order_types.into_iter().collect(),
        }
    }

    pub fn supports(&self, order_type: OrderType) -> bool {
        self.supported_order_types.contains(&order_type)
    }

    /// Weighted selection score, higher is better:
    ///
    /// `0.4 * liquidity + 0.3 * (1 - fee_rate) + 0.3 * 1 / (1 + latency_ms / 100)`
    pub fn score(&self) -> Decimal {
        let latency = Decimal::from(self.latency_ms) / Decimal::ONE_HUNDRED;
        LIQUIDITY_WEIGHT * self.liquidity_score
            + FEE_WEIGHT * (Decimal::ONE - self.fee_rate)
            + LATENCY_WEIGHT * (Decimal::ONE / (Decimal::ONE + latency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_formula() {
        // 0.4*0.9 + 0.3*0.999 + 0.3*(1/1.1)
        let venue = Venue::new("NYSE", dec!(0.001), dec!(0.9), 10, [OrderType::Market]);
        let expected = dec!(0.36) + dec!(0.2997) + dec!(0.3) * (Decimal::ONE / dec!(1.1));
        assert_eq!(venue.score(), expected);
    }

    #[test]
    fn test_zero_latency_gets_full_latency_credit() {
        let venue = Venue::new("LOCAL", Decimal::ZERO, Decimal::ZERO, 0, []);
        assert_eq!(venue.score(), dec!(0.6));
        assert!(!venue.supports(OrderType::Market));
    }
}
