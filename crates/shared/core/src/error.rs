//! Domain errors for order construction and lifecycle

use thiserror::Error;

use crate::entities::OrderStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("Invalid order {order_id}: {reason}")]
    Invalid { order_id: String, reason: String },

    #[error("Illegal status transition for {order_id}: {from:?} -> {to:?}")]
    IllegalTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Fill of {fill} exceeds remaining {remaining} on order {order_id}")]
    Overfill {
        order_id: String,
        fill: String,
        remaining: String,
    },
}

pub type OrderResult<T> = std::result::Result<T, OrderError>;
