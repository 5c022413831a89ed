//! Named view projections of the canonical order model
//!
//! One internal model, several external shapes: the detail view (full, with
//! history), the summary view (lists), and the table view (table-scoped
//! flow, menu items embedded). Totals are computed at projection time and
//! never stored.

use serde::{Deserialize, Serialize};

use super::types::{OrderItem, OrderStatus};
use crate::models::MenuItem;

/// Item line as exposed on the detail/summary views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemView {
    pub id: i64,
    pub menu_item_id: i64,
    pub quantity: i32,
    pub employee_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<OrderItem> for OrderItemView {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            menu_item_id: item.menu_item_id,
            quantity: item.quantity,
            employee_id: item.employee_id,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// One (status, timestamp) pair of the append-only history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistoryView {
    pub status: OrderStatus,
    pub timestamp: i64,
}

/// Full order detail: items, computed total and the whole status history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: i64,
    pub restaurant_id: i64,
    pub table_id: i64,
    pub user_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub timestamp: i64,
    pub status: OrderStatus,
    pub paid: bool,
    pub items: Vec<OrderItemView>,
    /// Σ quantity × menu price over the current items, 2-decimal rounded
    pub total_cost: f64,
    /// Ascending append order
    pub status_history: Vec<StatusHistoryView>,
}

/// List view — same head fields, no history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: i64,
    pub restaurant_id: i64,
    pub table_id: i64,
    pub user_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub timestamp: i64,
    pub status: OrderStatus,
    pub paid: bool,
    pub items: Vec<OrderItemView>,
    pub total_cost: f64,
}

/// Item line on the table view, menu item embedded for direct display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableOrderItem {
    pub id: i64,
    pub menu_item: MenuItem,
    pub quantity: i32,
    pub employee_id: Option<i64>,
}

/// Table-scoped view used by the walk-up ordering flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableOrder {
    pub id: i64,
    pub restaurant_id: i64,
    pub table_id: i64,
    pub user_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub timestamp: i64,
    pub status: OrderStatus,
    pub paid: bool,
    pub items: Vec<TableOrderItem>,
    pub total_cost: f64,
}

/// Result of cancelling a single item
///
/// `order_cancelled` is true when removing the last remaining item cascaded
/// into cancelling the whole order, so callers can report that distinctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelItemOutcome {
    pub order_cancelled: bool,
    pub order: OrderDetail,
}
