//! Core order records and inbound payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order status
///
/// COMPLETED and CANCELLED are terminal: once reached, neither the status
/// nor the item set may change again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Whether this status permits no further mutation
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

/// Order entity
///
/// `timestamp` is the creation time in ms and drives the
/// latest-order-per-table resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    /// Restaurant reference
    pub restaurant_id: i64,
    /// Dining table reference
    pub table_id: i64,
    /// Customer account in the external identity provider
    pub user_id: Option<i64>,
    /// Employee who placed/serves the order
    pub employee_id: Option<i64>,
    /// Creation time (ms since epoch)
    pub timestamp: i64,
    pub status: OrderStatus,
    pub paid: bool,
}

/// Order line item
///
/// Owned exclusively by one order; deleting the last item of an order
/// cancels the order itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    /// Owning order reference
    pub order_id: i64,
    /// Menu item reference
    pub menu_item_id: i64,
    pub quantity: i32,
    /// Employee who added the line
    pub employee_id: Option<i64>,
    /// Creation time (ms since epoch)
    pub created_at: i64,
    /// Last update time (ms since epoch)
    pub updated_at: i64,
}

/// Status history entry — append-only, one per status transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusHistory {
    pub id: i64,
    /// Order reference
    pub order_id: i64,
    pub status: OrderStatus,
    /// Append time (ms since epoch)
    pub timestamp: i64,
}

// =============================================================================
// Inbound payloads
// =============================================================================

/// One line of an order create/replace payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    pub menu_item_id: i64,
    /// Must be >= 1; zero or negative is a validation failure, never clamped
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub employee_id: Option<i64>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    pub table_id: i64,
    pub user_id: Option<i64>,
    pub employee_id: Option<i64>,
    #[validate(nested)]
    pub items: Vec<OrderItemInput>,
}

/// Update order payload — status, paid and items are independent axes;
/// absent fields are left untouched
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct OrderUpdate {
    pub table_id: Option<i64>,
    pub user_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub status: Option<OrderStatus>,
    pub paid: Option<bool>,
    #[validate(nested)]
    pub items: Option<Vec<OrderItemInput>>,
}

/// Payload for toggling the paid flag of a table's latest order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPaidUpdate {
    pub paid: bool,
}
