//! Router configuration
//!
//! The venue catalog as loaded from JSON:
//!
//! ```json
//! {
//!   "venues": [
//!     { "name": "NYSE", "fee_rate": "0.0010", "liquidity_score": "0.9",
//!       "latency_ms": 5, "supported_order_types": ["MARKET", "LIMIT"] }
//!   ]
//! }
//! ```

use crate::error::{Result, RouterError};
use meridian_core::Venue;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Venues in catalog order (first wins score ties)
    #[serde(default)]
    pub venues: Vec<Venue>,
}

impl RouterConfig {
    /// Check venue terms and name uniqueness
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for venue in &self.venues {
            if venue.name.trim().is_empty() {
                return Err(RouterError::InvalidConfig("venue name is empty".to_string()));
            }
            if !seen.insert(venue.name.as_str()) {
                return Err(RouterError::InvalidConfig(format!(
                    "duplicate venue {}",
                    venue.name
                )));
            }
            if venue.fee_rate < Decimal::ZERO || venue.fee_rate >= Decimal::ONE {
                return Err(RouterError::InvalidConfig(format!(
                    "fee_rate {} for {} must be in [0, 1)",
                    venue.fee_rate, venue.name
                )));
            }
            if venue.liquidity_score < Decimal::ZERO {
                return Err(RouterError::InvalidConfig(format!(
                    "liquidity_score for {} must not be negative",
                    venue.name
                )));
            }
        }
        Ok(())
    }
}
