mod order;
mod order_status;
mod order_type;
mod routing_record;
mod side;
mod time_in_force;
mod trade_request;
mod venue;

pub use order::{Order, OrderId};
pub use order_status::OrderStatus;
pub use order_type::OrderType;
pub use routing_record::RoutingRecord;
pub use side::Side;
pub use time_in_force::TimeInForce;
pub use trade_request::{PortfolioSnapshot, TradeRequest};
pub use venue::Venue;
