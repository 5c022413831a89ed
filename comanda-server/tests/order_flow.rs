//! End-to-end order lifecycle flows over on-disk storage

use comanda_server::db::Storage;
use comanda_server::db::repository::{
    CategoryRepository, DiningTableRepository, MenuItemRepository, RestaurantRepository,
};
use comanda_server::orders::{OrderError, OrderManager, TableOrderResolver};
use shared::models::{CategoryCreate, DiningTableCreate, MenuItemCreate, RestaurantCreate};
use shared::order::{OrderCreate, OrderItemInput, OrderStatus};

struct World {
    storage: Storage,
    manager: OrderManager,
    resolver: TableOrderResolver,
    restaurant_id: i64,
    table_id: i64,
    gambas_id: i64,
    tortilla_id: i64,
}

fn seed(storage: Storage) -> World {
    let restaurant = RestaurantRepository::new(storage.clone())
        .create(RestaurantCreate {
            name: "Casa Pepe".to_string(),
            owner_user_id: Some(1),
            address: Some("Plaza Mayor 2".to_string()),
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
                number: 7,
                qr_code: Some("casa-pepe-7".to_string()),
            },
        )
        .unwrap();
    let category = CategoryRepository::new(storage.clone())
        .create(
            restaurant.id,
            CategoryCreate {
                name: "Raciones".to_string(),
            },
        )
        .unwrap();
    let menu = MenuItemRepository::new(storage.clone());
    let gambas = menu
        .create(
            restaurant.id,
            MenuItemCreate {
                category_id: category.id,
                name: "Gambas al ajillo".to_string(),
                description: None,
                price: 12.5,
                image: None,
            },
        )
        .unwrap();
    let tortilla = menu
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
    World {
        storage,
        manager,
        resolver,
        restaurant_id: restaurant.id,
        table_id: table.id,
        gambas_id: gambas.id,
        tortilla_id: tortilla.id,
    }
}

fn line(menu_item_id: i64, quantity: i32) -> OrderItemInput {
    OrderItemInput {
        menu_item_id,
        quantity,
        employee_id: None,
    }
}

#[tokio::test]
async fn full_service_flow() {
    let world = seed(Storage::open_in_memory().unwrap());

    // The table orders two dishes
    let order = world
        .manager
        .create_order(
            world.restaurant_id,
            OrderCreate {
                table_id: world.table_id,
                user_id: Some(42),
                employee_id: None,
                items: vec![line(world.gambas_id, 2), line(world.tortilla_id, 1)],
            },
        )
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_cost, 33.0);

    // Kitchen picks it up
    let order = world
        .manager
        .update_status_and_paid(
            world.restaurant_id,
            order.id,
            Some(OrderStatus::InProgress),
            None,
        )
        .await
        .unwrap();

    // One dish is sent back; the other line stays, status untouched
    let outcome = world
        .manager
        .cancel_item(world.restaurant_id, order.id, order.items[1].id)
        .await
        .unwrap();
    assert!(!outcome.order_cancelled);
    assert_eq!(outcome.order.status, OrderStatus::InProgress);
    assert_eq!(outcome.order.total_cost, 25.0);

    // Served and paid
    let order = world
        .manager
        .update_status_and_paid(
            world.restaurant_id,
            order.id,
            Some(OrderStatus::Completed),
            Some(true),
        )
        .await
        .unwrap();
    assert!(order.paid);

    let statuses: Vec<_> = order.status_history.iter().map(|h| h.status).collect();
    assert_eq!(
        statuses,
        vec![
            OrderStatus::Pending,
            OrderStatus::InProgress,
            OrderStatus::Completed
        ]
    );

    // History timestamps never decrease
    let timestamps: Vec<_> = order.status_history.iter().map(|h| h.timestamp).collect();
    assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));

    // The completed order is immutable
    let result = world.manager.cancel_order(world.restaurant_id, order.id).await;
    assert!(matches!(result, Err(OrderError::OrderAlreadyCompleted(_))));
}

#[tokio::test]
async fn walk_up_tab_accumulates_until_paid() {
    let world = seed(Storage::open_in_memory().unwrap());

    let payload = |qty| OrderCreate {
        table_id: world.table_id,
        user_id: None,
        employee_id: None,
        items: vec![line(world.tortilla_id, qty)],
    };

    let (first, created) = world
        .resolver
        .create_or_update(world.restaurant_id, world.table_id, payload(1))
        .await
        .unwrap();
    assert!(created);

    let (second, created) = world
        .resolver
        .create_or_update(world.restaurant_id, world.table_id, payload(3))
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(second.id, first.id);
    assert_eq!(second.total_cost, 24.0);

    world
        .resolver
        .set_paid_for_latest(world.restaurant_id, world.table_id, true)
        .await
        .unwrap();

    let (third, created) = world
        .resolver
        .create_or_update(world.restaurant_id, world.table_id, payload(2))
        .await
        .unwrap();
    assert!(created);
    assert_ne!(third.id, first.id);
}

#[tokio::test]
async fn orders_and_history_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comanda.db");

    let (restaurant_id, order_id) = {
        let world = seed(Storage::open(&path).unwrap());
        let order = world
            .manager
            .create_order(
                world.restaurant_id,
                OrderCreate {
                    table_id: world.table_id,
                    user_id: None,
                    employee_id: None,
                    items: vec![line(world.gambas_id, 1)],
                },
            )
            .unwrap();
        world
            .manager
            .update_status_and_paid(
                world.restaurant_id,
                order.id,
                Some(OrderStatus::Completed),
                None,
            )
            .await
            .unwrap();
        drop(world.storage);
        (world.restaurant_id, order.id)
    };

    // A fresh handle on the same file sees the committed state
    let storage = Storage::open(&path).unwrap();
    let manager = OrderManager::new(storage);
    let order = manager.get_order(restaurant_id, order_id).unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(order.status_history.len(), 2);
    assert_eq!(order.total_cost, 12.5);
}

#[tokio::test]
async fn cascade_is_atomic_with_item_delete() {
    let world = seed(Storage::open_in_memory().unwrap());

    let order = world
        .manager
        .create_order(
            world.restaurant_id,
            OrderCreate {
                table_id: world.table_id,
                user_id: None,
                employee_id: None,
                items: vec![line(world.gambas_id, 1)],
            },
        )
        .unwrap();

    let outcome = world
        .manager
        .cancel_item(world.restaurant_id, order.id, order.items[0].id)
        .await
        .unwrap();
    assert!(outcome.order_cancelled);

    // Never observable: zero items on a non-terminal order
    let after = world.manager.get_order(world.restaurant_id, order.id).unwrap();
    assert!(after.items.is_empty());
    assert_eq!(after.status, OrderStatus::Cancelled);
    assert_eq!(after.total_cost, 0.0);
}
