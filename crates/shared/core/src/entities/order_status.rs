use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// ```text
/// Pending ──► Submitted ──► Partial ──► Filled
///    │            │            │
///    └────────────┴────────────┴──► Cancelled | Rejected | Expired
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Order has been created but not yet handed to a broker
    Pending,
    /// Broker accepted the order
    Submitted,
    /// Order has been partially filled
    Partial,
    /// Order has been completely filled
    Filled,
    /// Order has been cancelled by the user
    Cancelled,
    /// Order was rejected by the venue or by routing
    Rejected,
    /// Order has expired (GTD/DAY)
    Expired,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled
                | OrderStatus::Cancelled
                | OrderStatus::Rejected
                | OrderStatus::Expired
        )
    }

    /// Returns true if the order is still active
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Submitted | OrderStatus::Partial
        )
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    /// Status never moves backwards; `Partial -> Partial` covers repeated fills.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, Submitted | Cancelled | Rejected) => true,
            (Submitted, Partial | Filled | Cancelled | Rejected | Expired) => true,
            (Partial, Partial | Filled | Cancelled | Expired) => true,
            _ => false,
        }
    }
}
