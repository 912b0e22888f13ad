use serde::{Deserialize, Serialize};

use super::{OrderId, OrderType};
use crate::values::{Quantity, Timestamp};

/// Audit entry for one routing decision; appended before broker submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingRecord {
    pub order_id: OrderId,
    pub venue: String,
    pub timestamp: Timestamp,
    pub order_type: OrderType,
    pub quantity: Quantity,
}
