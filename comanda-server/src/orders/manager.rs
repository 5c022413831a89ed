//! OrderManager - the order lifecycle engine
//!
//! Single authority for creating, mutating and cancelling orders. Every
//! mutation:
//!
//! 1. takes the per-order lock (at most one in-flight mutation per order;
//!    different orders proceed independently)
//! 2. runs inside one redb write transaction, so multi-step changes —
//!    including the remove-last-item → cancel-order cascade — are
//!    all-or-nothing
//! 3. appends one status-history entry iff the status actually changed
//! 4. retries a bounded number of times on transient storage failures
//!
//! Terminal orders (COMPLETED / CANCELLED) reject every item or status
//! mutation. The only write allowed past a terminal state is the paid flag,
//! which is orthogonal to status and never touches history.

use std::sync::Arc;

use dashmap::DashMap;
use redb::{ReadTransaction, ReadableTable, WriteTransaction};
use tokio::sync::Mutex;

use super::{OrderError, history, projection};
use crate::db::{
    DINING_TABLES_TABLE, MENU_ITEMS_TABLE, ORDER_ITEMS_TABLE, ORDERS_TABLE, RESTAURANTS_TABLE,
    Storage,
};
use shared::models::{DiningTable, MenuItem};
use shared::order::{
    CancelItemOutcome, Order, OrderCreate, OrderDetail, OrderItem, OrderItemInput, OrderStatus,
    OrderStatusHistory, OrderSummary, OrderUpdate,
};
use shared::{now_millis, snowflake_id};

/// Bounded retry count for transient storage failures
const MAX_RETRIES: u32 = 3;

/// Order lifecycle engine
///
/// Cheap to clone; all clones share the lock map and the storage handle.
#[derive(Clone)]
pub struct OrderManager {
    storage: Storage,
    /// Per-order mutation locks (per-order serialization boundary)
    locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl OrderManager {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            locks: Arc::new(DashMap::new()),
        }
    }

    fn order_lock(&self, order_id: i64) -> Arc<Mutex<()>> {
        self.locks
            .entry(order_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Retry `f` on transient storage failures, up to [`MAX_RETRIES`]
    /// attempts. Business rejections are deterministic and returned as-is.
    fn with_retry<T>(
        &self,
        op: &'static str,
        f: impl Fn() -> Result<T, OrderError>,
    ) -> Result<T, OrderError> {
        let mut attempt = 1;
        loop {
            match f() {
                Err(e) if e.is_transient() && attempt < MAX_RETRIES => {
                    tracing::warn!(op, attempt, error = %e, "transient storage error, retrying");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    // ========== Mutations ==========

    /// Create an order in PENDING with its items and the first history entry
    pub fn create_order(
        &self,
        restaurant_id: i64,
        payload: OrderCreate,
    ) -> Result<OrderDetail, OrderError> {
        self.with_retry("create_order", || {
            self.create_order_once(restaurant_id, &payload)
        })
    }

    fn create_order_once(
        &self,
        restaurant_id: i64,
        payload: &OrderCreate,
    ) -> Result<OrderDetail, OrderError> {
        let order = Order {
            id: snowflake_id(),
            restaurant_id,
            table_id: payload.table_id,
            user_id: payload.user_id,
            employee_id: payload.employee_id,
            timestamp: now_millis(),
            status: OrderStatus::Pending,
            paid: false,
        };

        let txn = self.storage.begin_write()?;
        {
            check_restaurant(&txn, restaurant_id)?;
            check_table(&txn, restaurant_id, payload.table_id)?;
            write_items(&txn, order.id, restaurant_id, &payload.items)?;
            store_order(&txn, &order)?;
            history::append(&self.storage, &txn, order.id, order.status, order.timestamp)?;
        }
        txn.commit()?;

        self.detail(restaurant_id, order.id)
    }

    /// Apply a partial update: fields merged, items replaced wholesale when
    /// present. Fails on terminal orders with nothing mutated.
    pub async fn update_order(
        &self,
        restaurant_id: i64,
        order_id: i64,
        update: OrderUpdate,
    ) -> Result<OrderDetail, OrderError> {
        let lock = self.order_lock(order_id);
        let _guard = lock.lock().await;
        self.with_retry("update_order", || {
            self.update_order_once(restaurant_id, order_id, &update)
        })
    }

    fn update_order_once(
        &self,
        restaurant_id: i64,
        order_id: i64,
        update: &OrderUpdate,
    ) -> Result<OrderDetail, OrderError> {
        let txn = self.storage.begin_write()?;
        {
            let mut order = load_order_for_update(&txn, restaurant_id, order_id)?;
            ensure_mutable(&order)?;

            if let Some(table_id) = update.table_id {
                check_table(&txn, restaurant_id, table_id)?;
                order.table_id = table_id;
            }
            if let Some(user_id) = update.user_id {
                order.user_id = Some(user_id);
            }
            if let Some(employee_id) = update.employee_id {
                order.employee_id = Some(employee_id);
            }
            if let Some(paid) = update.paid {
                order.paid = paid;
            }

            let prev_status = order.status;
            if let Some(status) = update.status {
                order.status = status;
            }

            if let Some(items) = &update.items {
                clear_items(&txn, order_id)?;
                write_items(&txn, order_id, restaurant_id, items)?;
            }

            store_order(&txn, &order)?;

            // One history entry iff the status actually changed; replacing
            // items or toggling paid never appends
            if order.status != prev_status {
                history::append(&self.storage, &txn, order_id, order.status, now_millis())?;
            }
        }
        txn.commit()?;

        self.detail(restaurant_id, order_id)
    }

    /// Atomically discard all items and write the replacement set
    pub async fn replace_items(
        &self,
        restaurant_id: i64,
        order_id: i64,
        items: Vec<OrderItemInput>,
    ) -> Result<OrderDetail, OrderError> {
        self.update_order(
            restaurant_id,
            order_id,
            OrderUpdate {
                items: Some(items),
                ..Default::default()
            },
        )
        .await
    }

    /// Update status and/or paid; both absent is a no-op update
    pub async fn update_status_and_paid(
        &self,
        restaurant_id: i64,
        order_id: i64,
        status: Option<OrderStatus>,
        paid: Option<bool>,
    ) -> Result<OrderDetail, OrderError> {
        self.update_order(
            restaurant_id,
            order_id,
            OrderUpdate {
                status,
                paid,
                ..Default::default()
            },
        )
        .await
    }

    /// Toggle the paid flag only
    ///
    /// Paid is orthogonal to status: this works on terminal orders too and
    /// never appends a history entry.
    pub async fn set_paid(
        &self,
        restaurant_id: i64,
        order_id: i64,
        paid: bool,
    ) -> Result<OrderDetail, OrderError> {
        let lock = self.order_lock(order_id);
        let _guard = lock.lock().await;
        self.with_retry("set_paid", || {
            let txn = self.storage.begin_write()?;
            {
                let mut order = load_order_for_update(&txn, restaurant_id, order_id)?;
                order.paid = paid;
                store_order(&txn, &order)?;
            }
            txn.commit()?;
            self.detail(restaurant_id, order_id)
        })
    }

    /// Cancel a whole order; rejected once terminal
    pub async fn cancel_order(
        &self,
        restaurant_id: i64,
        order_id: i64,
    ) -> Result<OrderDetail, OrderError> {
        let lock = self.order_lock(order_id);
        let _guard = lock.lock().await;
        self.with_retry("cancel_order", || {
            self.cancel_order_once(restaurant_id, order_id)
        })
    }

    fn cancel_order_once(
        &self,
        restaurant_id: i64,
        order_id: i64,
    ) -> Result<OrderDetail, OrderError> {
        let txn = self.storage.begin_write()?;
        {
            let mut order = load_order_for_update(&txn, restaurant_id, order_id)?;
            ensure_mutable(&order)?;
            order.status = OrderStatus::Cancelled;
            store_order(&txn, &order)?;
            history::append(&self.storage, &txn, order_id, order.status, now_millis())?;
        }
        txn.commit()?;

        self.detail(restaurant_id, order_id)
    }

    /// Delete one item; cancelling the last remaining item cascades into
    /// cancelling the order, atomically with the deletion
    pub async fn cancel_item(
        &self,
        restaurant_id: i64,
        order_id: i64,
        item_id: i64,
    ) -> Result<CancelItemOutcome, OrderError> {
        let lock = self.order_lock(order_id);
        let _guard = lock.lock().await;
        self.with_retry("cancel_item", || {
            self.cancel_item_once(restaurant_id, order_id, item_id)
        })
    }

    fn cancel_item_once(
        &self,
        restaurant_id: i64,
        order_id: i64,
        item_id: i64,
    ) -> Result<CancelItemOutcome, OrderError> {
        let txn = self.storage.begin_write()?;
        let cascaded = {
            let mut order = load_order_for_update(&txn, restaurant_id, order_id)?;
            ensure_mutable(&order)?;

            let mut items_table = txn.open_table(ORDER_ITEMS_TABLE)?;
            if items_table.remove((order_id, item_id))?.is_none() {
                return Err(OrderError::ItemNotFound(item_id));
            }
            let mut remaining = 0usize;
            for entry in items_table.range((order_id, i64::MIN)..=(order_id, i64::MAX))? {
                entry?;
                remaining += 1;
            }

            let cascaded = remaining == 0;
            if cascaded {
                order.status = OrderStatus::Cancelled;
                store_order(&txn, &order)?;
                history::append(&self.storage, &txn, order_id, order.status, now_millis())?;
            }
            cascaded
        };
        txn.commit()?;

        let order = self.detail(restaurant_id, order_id)?;
        Ok(CancelItemOutcome {
            order_cancelled: cascaded,
            order,
        })
    }

    // ========== Reads ==========

    /// Detail view of one order
    pub fn get_order(&self, restaurant_id: i64, order_id: i64) -> Result<OrderDetail, OrderError> {
        self.detail(restaurant_id, order_id)
    }

    /// All orders of a restaurant, newest first
    pub fn list_orders(&self, restaurant_id: i64) -> Result<Vec<OrderSummary>, OrderError> {
        let txn = self.storage.begin_read()?;
        let mut orders = Vec::new();
        {
            let table = txn.open_table(ORDERS_TABLE)?;
            for entry in table.iter()? {
                let (_, value) = entry?;
                let order: Order = serde_json::from_slice(value.value())?;
                if order.restaurant_id == restaurant_id {
                    orders.push(order);
                }
            }
        }
        orders.sort_by_key(|o| std::cmp::Reverse((o.timestamp, o.id)));

        let mut summaries = Vec::with_capacity(orders.len());
        for order in &orders {
            summaries.push(projection::summary(&txn, order)?);
        }
        Ok(summaries)
    }

    /// Computed total of an order's current items; zero for no items
    pub fn total_cost(&self, restaurant_id: i64, order_id: i64) -> Result<f64, OrderError> {
        let txn = self.storage.begin_read()?;
        let order = load_order(&txn, restaurant_id, order_id)?;
        let items = projection::items_for(&txn, order.id)?;
        Ok(projection::total_of(&txn, &items)?)
    }

    /// The order's full status history, append order
    pub fn status_history(
        &self,
        restaurant_id: i64,
        order_id: i64,
    ) -> Result<Vec<OrderStatusHistory>, OrderError> {
        let txn = self.storage.begin_read()?;
        load_order(&txn, restaurant_id, order_id)?;
        Ok(history::list_for(&txn, order_id)?)
    }

    fn detail(&self, restaurant_id: i64, order_id: i64) -> Result<OrderDetail, OrderError> {
        let txn = self.storage.begin_read()?;
        let order = load_order(&txn, restaurant_id, order_id)?;
        Ok(projection::detail(&txn, &order)?)
    }
}

// ========== Transaction-scoped helpers ==========

/// Load an order within a read transaction, scoped by restaurant
pub(crate) fn load_order(
    txn: &ReadTransaction,
    restaurant_id: i64,
    order_id: i64,
) -> Result<Order, OrderError> {
    let table = txn.open_table(ORDERS_TABLE)?;
    let order: Order = match table.get(order_id)? {
        Some(value) => serde_json::from_slice(value.value())?,
        None => return Err(OrderError::OrderNotFound(order_id)),
    };
    if order.restaurant_id != restaurant_id {
        // Cross-restaurant ids are indistinguishable from missing ones
        return Err(OrderError::OrderNotFound(order_id));
    }
    Ok(order)
}

fn load_order_for_update(
    txn: &WriteTransaction,
    restaurant_id: i64,
    order_id: i64,
) -> Result<Order, OrderError> {
    let table = txn.open_table(ORDERS_TABLE)?;
    let order: Order = match table.get(order_id)? {
        Some(value) => serde_json::from_slice(value.value())?,
        None => return Err(OrderError::OrderNotFound(order_id)),
    };
    if order.restaurant_id != restaurant_id {
        return Err(OrderError::OrderNotFound(order_id));
    }
    Ok(order)
}

fn store_order(txn: &WriteTransaction, order: &Order) -> Result<(), OrderError> {
    let mut table = txn.open_table(ORDERS_TABLE)?;
    table.insert(order.id, serde_json::to_vec(order)?.as_slice())?;
    Ok(())
}

fn ensure_mutable(order: &Order) -> Result<(), OrderError> {
    match order.status {
        OrderStatus::Completed => Err(OrderError::OrderAlreadyCompleted(order.id)),
        OrderStatus::Cancelled => Err(OrderError::OrderAlreadyCancelled(order.id)),
        _ => Ok(()),
    }
}

fn check_restaurant(txn: &WriteTransaction, restaurant_id: i64) -> Result<(), OrderError> {
    let table = txn.open_table(RESTAURANTS_TABLE)?;
    if table.get(restaurant_id)?.is_none() {
        return Err(OrderError::RestaurantNotFound(restaurant_id));
    }
    Ok(())
}

fn check_table(txn: &WriteTransaction, restaurant_id: i64, table_id: i64) -> Result<(), OrderError> {
    let table = txn.open_table(DINING_TABLES_TABLE)?;
    let dining_table: DiningTable = match table.get(table_id)? {
        Some(value) => serde_json::from_slice(value.value())?,
        None => return Err(OrderError::TableNotFound(table_id)),
    };
    if dining_table.restaurant_id != restaurant_id {
        return Err(OrderError::TableNotFound(table_id));
    }
    Ok(())
}

/// Validate and insert one item row per input
///
/// Quantity must be >= 1 and the menu item must belong to the order's
/// restaurant; both violations are validation failures, never clamped.
fn write_items(
    txn: &WriteTransaction,
    order_id: i64,
    restaurant_id: i64,
    inputs: &[OrderItemInput],
) -> Result<(), OrderError> {
    let menu_table = txn.open_table(MENU_ITEMS_TABLE)?;
    let mut items_table = txn.open_table(ORDER_ITEMS_TABLE)?;
    let now = now_millis();

    for input in inputs {
        if input.quantity < 1 {
            return Err(OrderError::Validation(format!(
                "quantity must be >= 1, got {}",
                input.quantity
            )));
        }
        let menu: MenuItem = match menu_table.get(input.menu_item_id)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => {
                return Err(OrderError::Validation(format!(
                    "Menu item {} does not exist",
                    input.menu_item_id
                )));
            }
        };
        if menu.restaurant_id != restaurant_id {
            return Err(OrderError::Validation(format!(
                "Menu item {} does not belong to restaurant {}",
                input.menu_item_id, restaurant_id
            )));
        }

        let item = OrderItem {
            id: snowflake_id(),
            order_id,
            menu_item_id: input.menu_item_id,
            quantity: input.quantity,
            employee_id: input.employee_id,
            created_at: now,
            updated_at: now,
        };
        items_table.insert((order_id, item.id), serde_json::to_vec(&item)?.as_slice())?;
    }
    Ok(())
}

fn clear_items(txn: &WriteTransaction, order_id: i64) -> Result<(), OrderError> {
    let mut table = txn.open_table(ORDER_ITEMS_TABLE)?;
    let keys: Vec<(i64, i64)> = table
        .range((order_id, i64::MIN)..=(order_id, i64::MAX))?
        .map(|entry| entry.map(|(key, _)| key.value()))
        .collect::<Result<_, _>>()?;
    for key in keys {
        table.remove(key)?;
    }
    Ok(())
}
