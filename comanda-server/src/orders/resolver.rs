//! Latest-order-per-table resolution
//!
//! Point-of-sale flows treat a table as one open tab: repeated submissions
//! accumulate into the latest unpaid order until the table pays, then the
//! next submission opens a fresh order. This module owns that resolution;
//! all actual mutation goes through the [`OrderManager`].

use redb::{ReadTransaction, ReadableTable};

use super::manager::load_order;
use super::{OrderError, OrderManager, projection};
use crate::db::{DINING_TABLES_TABLE, ORDERS_TABLE, Storage};
use shared::models::DiningTable;
use shared::order::{Order, OrderCreate, OrderUpdate, TableOrder};

/// Resolves the "current" order of a (restaurant, table) pair
#[derive(Clone)]
pub struct TableOrderResolver {
    storage: Storage,
    manager: OrderManager,
}

impl TableOrderResolver {
    pub fn new(storage: Storage, manager: OrderManager) -> Self {
        Self { storage, manager }
    }

    /// The order with the greatest creation timestamp for the pair, or
    /// `None` when the table has no orders yet (not an error)
    ///
    /// Tie-break on equal timestamps: the higher order id wins. Ids are
    /// time-ordered snowflakes, so this is deterministic and "newest wins".
    pub fn find_latest(
        &self,
        restaurant_id: i64,
        table_id: i64,
    ) -> Result<Option<Order>, OrderError> {
        let txn = self.storage.begin_read()?;
        check_table(&txn, restaurant_id, table_id)?;
        find_latest_in(&txn, restaurant_id, table_id)
    }

    /// Latest order projected as the table view
    pub fn latest_view(
        &self,
        restaurant_id: i64,
        table_id: i64,
    ) -> Result<Option<TableOrder>, OrderError> {
        let txn = self.storage.begin_read()?;
        check_table(&txn, restaurant_id, table_id)?;
        match find_latest_in(&txn, restaurant_id, table_id)? {
            Some(order) => Ok(Some(projection::table_view(&txn, &order)?)),
            None => Ok(None),
        }
    }

    /// All orders of a table, newest first
    pub fn orders_for_table(
        &self,
        restaurant_id: i64,
        table_id: i64,
    ) -> Result<Vec<TableOrder>, OrderError> {
        let txn = self.storage.begin_read()?;
        check_table(&txn, restaurant_id, table_id)?;
        let mut orders = orders_of_table(&txn, restaurant_id, table_id)?;
        orders.sort_by_key(|o| std::cmp::Reverse((o.timestamp, o.id)));

        let mut views = Vec::with_capacity(orders.len());
        for order in &orders {
            views.push(projection::table_view(&txn, order)?);
        }
        Ok(views)
    }

    /// Extend the open tab or start a new one
    ///
    /// If the latest order exists, is unpaid and not terminal, the payload
    /// is applied as a full update of that order (items replaced, fields
    /// merged). Otherwise a brand-new order is created. Returns the view
    /// plus whether a new order was created.
    pub async fn create_or_update(
        &self,
        restaurant_id: i64,
        table_id: i64,
        payload: OrderCreate,
    ) -> Result<(TableOrder, bool), OrderError> {
        let latest = self.find_latest(restaurant_id, table_id)?;

        match latest {
            // A terminal latest order behaves like a paid one: the tab is
            // closed, new input starts a new order
            Some(open_tab) if !open_tab.paid && !open_tab.status.is_terminal() => {
                let update = OrderUpdate {
                    table_id: Some(table_id),
                    user_id: payload.user_id,
                    employee_id: payload.employee_id,
                    status: None,
                    paid: None,
                    items: Some(payload.items),
                };
                let detail = self
                    .manager
                    .update_order(restaurant_id, open_tab.id, update)
                    .await?;
                Ok((self.view_of(restaurant_id, detail.id)?, false))
            }
            _ => {
                let payload = OrderCreate {
                    table_id,
                    ..payload
                };
                let detail = self.manager.create_order(restaurant_id, payload)?;
                Ok((self.view_of(restaurant_id, detail.id)?, true))
            }
        }
    }

    /// Toggle the paid flag of the latest order; NotFound when the table
    /// has no orders. Status and items stay untouched, no history entry.
    pub async fn set_paid_for_latest(
        &self,
        restaurant_id: i64,
        table_id: i64,
        paid: bool,
    ) -> Result<TableOrder, OrderError> {
        let latest = self
            .find_latest(restaurant_id, table_id)?
            .ok_or(OrderError::NoOrdersForTable(table_id))?;
        self.manager.set_paid(restaurant_id, latest.id, paid).await?;
        self.view_of(restaurant_id, latest.id)
    }

    fn view_of(&self, restaurant_id: i64, order_id: i64) -> Result<TableOrder, OrderError> {
        let txn = self.storage.begin_read()?;
        let order = load_order(&txn, restaurant_id, order_id)?;
        Ok(projection::table_view(&txn, &order)?)
    }
}

fn check_table(txn: &ReadTransaction, restaurant_id: i64, table_id: i64) -> Result<(), OrderError> {
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

fn orders_of_table(
    txn: &ReadTransaction,
    restaurant_id: i64,
    table_id: i64,
) -> Result<Vec<Order>, OrderError> {
    let table = txn.open_table(ORDERS_TABLE)?;
    let mut orders = Vec::new();
    for entry in table.iter()? {
        let (_, value) = entry?;
        let order: Order = serde_json::from_slice(value.value())?;
        if order.restaurant_id == restaurant_id && order.table_id == table_id {
            orders.push(order);
        }
    }
    Ok(orders)
}

fn find_latest_in(
    txn: &ReadTransaction,
    restaurant_id: i64,
    table_id: i64,
) -> Result<Option<Order>, OrderError> {
    let orders = orders_of_table(txn, restaurant_id, table_id)?;
    Ok(orders.into_iter().max_by_key(|o| (o.timestamp, o.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{
        CategoryRepository, DiningTableRepository, MenuItemRepository, RestaurantRepository,
    };
    use shared::models::{CategoryCreate, DiningTableCreate, MenuItemCreate, RestaurantCreate};
    use shared::order::{OrderItemInput, OrderStatus};

    struct Fixture {
        storage: Storage,
        resolver: TableOrderResolver,
        manager: OrderManager,
        restaurant_id: i64,
        table_id: i64,
        menu_item_id: i64,
    }

    fn fixture() -> Fixture {
        let storage = Storage::open_in_memory().unwrap();
        let restaurant = RestaurantRepository::new(storage.clone())
            .create(RestaurantCreate {
                name: "La Concha".to_string(),
                owner_user_id: None,
                address: None,
                phone: None,
                description: None,
                logo: None,
                banner_image: None,
            })
            .unwrap();
        let table = DiningTableRepository::new(storage.clone())
            .create(
                restaurant.id,
                DiningTableCreate {
                    number: 3,
                    qr_code: None,
                },
            )
            .unwrap();
        let category = CategoryRepository::new(storage.clone())
            .create(
                restaurant.id,
                CategoryCreate {
                    name: "Tapas".to_string(),
                },
            )
            .unwrap();
        let menu_item = MenuItemRepository::new(storage.clone())
            .create(
                restaurant.id,
                MenuItemCreate {
                    category_id: category.id,
                    name: "Tortilla".to_string(),
                    description: None,
                    price: 8.0,
                    image: None,
                },
            )
            .unwrap();

        let manager = OrderManager::new(storage.clone());
        let resolver = TableOrderResolver::new(storage.clone(), manager.clone());
        Fixture {
            storage,
            resolver,
            manager,
            restaurant_id: restaurant.id,
            table_id: table.id,
            menu_item_id: menu_item.id,
        }
    }

    fn lines(fx: &Fixture, quantity: i32) -> Vec<OrderItemInput> {
        vec![OrderItemInput {
            menu_item_id: fx.menu_item_id,
            quantity,
            employee_id: None,
        }]
    }

    fn payload(fx: &Fixture, quantity: i32) -> OrderCreate {
        OrderCreate {
            table_id: fx.table_id,
            user_id: None,
            employee_id: None,
            items: lines(fx, quantity),
        }
    }

    /// Write an order head record directly, with a pinned timestamp
    fn seed_order(fx: &Fixture, id: i64, timestamp: i64) {
        let order = Order {
            id,
            restaurant_id: fx.restaurant_id,
            table_id: fx.table_id,
            user_id: None,
            employee_id: None,
            timestamp,
            status: OrderStatus::Pending,
            paid: false,
        };
        let txn = fx.storage.begin_write().unwrap();
        {
            let mut table = txn.open_table(ORDERS_TABLE).unwrap();
            table
                .insert(order.id, serde_json::to_vec(&order).unwrap().as_slice())
                .unwrap();
        }
        txn.commit().unwrap();
    }

    #[test]
    fn no_orders_resolves_to_none() {
        let fx = fixture();
        assert!(
            fx.resolver
                .find_latest(fx.restaurant_id, fx.table_id)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn unknown_table_is_an_error() {
        let fx = fixture();
        let result = fx.resolver.find_latest(fx.restaurant_id, 999);
        assert!(matches!(result, Err(OrderError::TableNotFound(999))));
    }

    #[test]
    fn latest_prefers_greater_timestamp() {
        let fx = fixture();
        seed_order(&fx, 100, 1_000);
        seed_order(&fx, 200, 2_000);
        let latest = fx
            .resolver
            .find_latest(fx.restaurant_id, fx.table_id)
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, 200);
    }

    #[test]
    fn equal_timestamps_resolve_deterministically() {
        let fx = fixture();
        seed_order(&fx, 300, 5_000);
        seed_order(&fx, 100, 5_000);

        // Higher id wins, and repeated resolution never flips
        for _ in 0..3 {
            let latest = fx
                .resolver
                .find_latest(fx.restaurant_id, fx.table_id)
                .unwrap()
                .unwrap();
            assert_eq!(latest.id, 300);
        }
    }

    #[tokio::test]
    async fn repeat_submissions_accumulate_into_one_open_tab() {
        let fx = fixture();

        let (first, created) = fx
            .resolver
            .create_or_update(fx.restaurant_id, fx.table_id, payload(&fx, 1))
            .await
            .unwrap();
        assert!(created);

        // Second submission updates the same order instead of opening a new one
        let (second, created) = fx
            .resolver
            .create_or_update(fx.restaurant_id, fx.table_id, payload(&fx, 4))
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].quantity, 4);
        assert_eq!(second.total_cost, 32.0);

        // After payment the tab is closed; the next submission opens a new order
        fx.resolver
            .set_paid_for_latest(fx.restaurant_id, fx.table_id, true)
            .await
            .unwrap();
        let (third, created) = fx
            .resolver
            .create_or_update(fx.restaurant_id, fx.table_id, payload(&fx, 2))
            .await
            .unwrap();
        assert!(created);
        assert_ne!(third.id, first.id);
    }

    #[tokio::test]
    async fn cancelled_tab_is_not_reopened() {
        let fx = fixture();
        let (first, _) = fx
            .resolver
            .create_or_update(fx.restaurant_id, fx.table_id, payload(&fx, 1))
            .await
            .unwrap();
        fx.manager
            .cancel_order(fx.restaurant_id, first.id)
            .await
            .unwrap();

        // Latest is unpaid but terminal: a new order must be created
        let (second, created) = fx
            .resolver
            .create_or_update(fx.restaurant_id, fx.table_id, payload(&fx, 1))
            .await
            .unwrap();
        assert!(created);
        assert_ne!(second.id, first.id);
    }

    #[tokio::test]
    async fn set_paid_without_orders_is_not_found() {
        let fx = fixture();
        let result = fx
            .resolver
            .set_paid_for_latest(fx.restaurant_id, fx.table_id, true)
            .await;
        assert!(matches!(result, Err(OrderError::NoOrdersForTable(_))));
    }

    #[tokio::test]
    async fn set_paid_leaves_status_and_history_untouched() {
        let fx = fixture();
        fx.resolver
            .create_or_update(fx.restaurant_id, fx.table_id, payload(&fx, 1))
            .await
            .unwrap();

        let paid = fx
            .resolver
            .set_paid_for_latest(fx.restaurant_id, fx.table_id, true)
            .await
            .unwrap();
        assert!(paid.paid);
        assert_eq!(paid.status, OrderStatus::Pending);

        let history = fx
            .manager
            .status_history(fx.restaurant_id, paid.id)
            .unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn table_view_embeds_menu_items() {
        let fx = fixture();
        fx.resolver
            .create_or_update(fx.restaurant_id, fx.table_id, payload(&fx, 2))
            .await
            .unwrap();

        let view = fx
            .resolver
            .latest_view(fx.restaurant_id, fx.table_id)
            .unwrap()
            .unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].menu_item.name, "Tortilla");
        assert_eq!(view.total_cost, 16.0);
    }
}
