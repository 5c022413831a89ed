//! View projections over the canonical order model
//!
//! Each projection reads everything it needs from one read transaction, so
//! a view never mixes two storage snapshots. Totals are computed here, on
//! demand, and never written back.

use redb::{ReadTransaction, ReadableTable};

use super::{history, money};
use crate::db::{MENU_ITEMS_TABLE, ORDER_ITEMS_TABLE, StorageResult};
use shared::models::MenuItem;
use shared::order::{
    Order, OrderDetail, OrderItem, OrderSummary, StatusHistoryView, TableOrder, TableOrderItem,
};

/// Current line items of an order, in insertion order
pub fn items_for(txn: &ReadTransaction, order_id: i64) -> StorageResult<Vec<OrderItem>> {
    let table = txn.open_table(ORDER_ITEMS_TABLE)?;
    let mut items = Vec::new();
    for entry in table.range((order_id, i64::MIN)..=(order_id, i64::MAX))? {
        let (_, value) = entry?;
        items.push(serde_json::from_slice(value.value())?);
    }
    Ok(items)
}

fn menu_item(txn: &ReadTransaction, id: i64) -> StorageResult<Option<MenuItem>> {
    let table = txn.open_table(MENU_ITEMS_TABLE)?;
    match table.get(id)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

/// Σ quantity × menu price over the given items
///
/// A dangling menu-item reference contributes zero rather than failing the
/// whole read; historical orders stay readable after menu edits.
pub fn total_of(txn: &ReadTransaction, items: &[OrderItem]) -> StorageResult<f64> {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        match menu_item(txn, item.menu_item_id)? {
            Some(menu) => lines.push((menu.price, item.quantity)),
            None => {
                tracing::warn!(
                    menu_item_id = item.menu_item_id,
                    order_id = item.order_id,
                    "menu item missing while computing total, counting as zero"
                );
            }
        }
    }
    Ok(money::order_total(lines))
}

/// Full detail view: items, computed total, complete status history
pub fn detail(txn: &ReadTransaction, order: &Order) -> StorageResult<OrderDetail> {
    let items = items_for(txn, order.id)?;
    let total_cost = total_of(txn, &items)?;
    let status_history = history::list_for(txn, order.id)?
        .into_iter()
        .map(|entry| StatusHistoryView {
            status: entry.status,
            timestamp: entry.timestamp,
        })
        .collect();

    Ok(OrderDetail {
        id: order.id,
        restaurant_id: order.restaurant_id,
        table_id: order.table_id,
        user_id: order.user_id,
        employee_id: order.employee_id,
        timestamp: order.timestamp,
        status: order.status,
        paid: order.paid,
        items: items.into_iter().map(Into::into).collect(),
        total_cost,
        status_history,
    })
}

/// List view: no history
pub fn summary(txn: &ReadTransaction, order: &Order) -> StorageResult<OrderSummary> {
    let items = items_for(txn, order.id)?;
    let total_cost = total_of(txn, &items)?;

    Ok(OrderSummary {
        id: order.id,
        restaurant_id: order.restaurant_id,
        table_id: order.table_id,
        user_id: order.user_id,
        employee_id: order.employee_id,
        timestamp: order.timestamp,
        status: order.status,
        paid: order.paid,
        items: items.into_iter().map(Into::into).collect(),
        total_cost,
    })
}

/// Table-scoped view: menu items embedded for direct display
pub fn table_view(txn: &ReadTransaction, order: &Order) -> StorageResult<TableOrder> {
    let items = items_for(txn, order.id)?;
    let total_cost = total_of(txn, &items)?;

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        // Lines whose menu item vanished are skipped, matching total_of
        if let Some(menu) = menu_item(txn, item.menu_item_id)? {
            lines.push(TableOrderItem {
                id: item.id,
                menu_item: menu,
                quantity: item.quantity,
                employee_id: item.employee_id,
            });
        }
    }

    Ok(TableOrder {
        id: order.id,
        restaurant_id: order.restaurant_id,
        table_id: order.table_id,
        user_id: order.user_id,
        employee_id: order.employee_id,
        timestamp: order.timestamp,
        status: order.status,
        paid: order.paid,
        items: lines,
        total_cost,
    })
}
