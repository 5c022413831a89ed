//! Order domain types
//!
//! One canonical order model plus named view projections. The server's
//! lifecycle engine is the only writer of these records; everything here is
//! plain data.

mod types;
mod views;

pub use types::{
    Order, OrderCreate, OrderItem, OrderItemInput, OrderPaidUpdate, OrderStatus,
    OrderStatusHistory, OrderUpdate,
};
pub use views::{
    CancelItemOutcome, OrderDetail, OrderItemView, OrderSummary, StatusHistoryView, TableOrder,
    TableOrderItem,
};
