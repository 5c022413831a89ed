//! Restaurant Repository

use redb::ReadableTable;

use super::{RepoError, RepoResult};
use crate::db::{
    CATEGORIES_TABLE, DINING_TABLES_TABLE, EMPLOYEES_TABLE, MENU_ITEMS_TABLE, ORDER_ITEMS_TABLE,
    ORDERS_TABLE, RESTAURANTS_TABLE, STATUS_HISTORY_TABLE, Storage,
};
use shared::models::{Restaurant, RestaurantCreate, RestaurantUpdate};
use shared::order::Order;
use shared::{now_millis, snowflake_id};

#[derive(Clone)]
pub struct RestaurantRepository {
    storage: Storage,
}

impl RestaurantRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Find all restaurants, optionally filtered by a name substring
    pub fn find_all(&self, search: Option<&str>) -> RepoResult<Vec<Restaurant>> {
        let txn = self.storage.begin_read()?;
        let table = txn.open_table(RESTAURANTS_TABLE)?;
        let needle = search.map(str::to_lowercase);
        let mut restaurants = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let restaurant: Restaurant = serde_json::from_slice(value.value())?;
            if let Some(q) = &needle
                && !restaurant.name.to_lowercase().contains(q)
            {
                continue;
            }
            restaurants.push(restaurant);
        }
        restaurants.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(restaurants)
    }

    /// Find restaurant by id
    pub fn find_by_id(&self, id: i64) -> RepoResult<Option<Restaurant>> {
        let txn = self.storage.begin_read()?;
        let table = txn.open_table(RESTAURANTS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Create a new restaurant
    pub fn create(&self, data: RestaurantCreate) -> RepoResult<Restaurant> {
        let restaurant = Restaurant {
            id: snowflake_id(),
            owner_user_id: data.owner_user_id,
            name: data.name,
            address: data.address,
            phone: data.phone,
            description: data.description,
            logo: data.logo,
            banner_image: data.banner_image,
            created_at: now_millis(),
        };

        let txn = self.storage.begin_write()?;
        {
            let mut table = txn.open_table(RESTAURANTS_TABLE)?;
            table.insert(restaurant.id, serde_json::to_vec(&restaurant)?.as_slice())?;
        }
        txn.commit()?;
        Ok(restaurant)
    }

    /// Update a restaurant (absent fields untouched)
    pub fn update(&self, id: i64, data: RestaurantUpdate) -> RepoResult<Restaurant> {
        let txn = self.storage.begin_write()?;
        let updated = {
            let mut table = txn.open_table(RESTAURANTS_TABLE)?;
            let existing: Restaurant = match table.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(RepoError::NotFound(format!("Restaurant {} not found", id))),
            };

            let updated = Restaurant {
                id: existing.id,
                owner_user_id: data.owner_user_id.or(existing.owner_user_id),
                name: data.name.unwrap_or(existing.name),
                address: data.address.or(existing.address),
                phone: data.phone.or(existing.phone),
                description: data.description.or(existing.description),
                logo: data.logo.or(existing.logo),
                banner_image: data.banner_image.or(existing.banner_image),
                created_at: existing.created_at,
            };
            table.insert(id, serde_json::to_vec(&updated)?.as_slice())?;
            updated
        };
        txn.commit()?;
        Ok(updated)
    }

    /// Delete a restaurant and everything scoped under it
    ///
    /// The whole cascade (catalog, orders, items, history) is one
    /// transaction, so a crash cannot leave orphaned children behind.
    pub fn delete(&self, id: i64) -> RepoResult<bool> {
        let txn = self.storage.begin_write()?;
        let existed = {
            let mut table = txn.open_table(RESTAURANTS_TABLE)?;
            let existed = table.remove(id)?.is_some();
            if existed {
                // Scoped catalog entities
                for def in [
                    CATEGORIES_TABLE,
                    EMPLOYEES_TABLE,
                    DINING_TABLES_TABLE,
                    MENU_ITEMS_TABLE,
                ] {
                    let mut child = txn.open_table(def)?;
                    let ids: Vec<i64> = child
                        .iter()?
                        .filter_map(|entry| {
                            let (key, value) = entry.ok()?;
                            let parsed: serde_json::Value =
                                serde_json::from_slice(value.value()).ok()?;
                            (parsed.get("restaurant_id")?.as_i64()? == id)
                                .then_some(key.value())
                        })
                        .collect();
                    for child_id in ids {
                        child.remove(child_id)?;
                    }
                }

                // Orders plus their items and history
                let mut orders = txn.open_table(ORDERS_TABLE)?;
                let order_ids: Vec<i64> = orders
                    .iter()?
                    .filter_map(|entry| {
                        let (key, value) = entry.ok()?;
                        let order: Order = serde_json::from_slice(value.value()).ok()?;
                        (order.restaurant_id == id).then_some(key.value())
                    })
                    .collect();
                let mut items = txn.open_table(ORDER_ITEMS_TABLE)?;
                let mut history = txn.open_table(STATUS_HISTORY_TABLE)?;
                for order_id in order_ids {
                    orders.remove(order_id)?;
                    let item_keys: Vec<(i64, i64)> = items
                        .range((order_id, i64::MIN)..=(order_id, i64::MAX))?
                        .filter_map(|entry| entry.ok().map(|(key, _)| key.value()))
                        .collect();
                    for key in item_keys {
                        items.remove(key)?;
                    }
                    let history_keys: Vec<(i64, u64)> = history
                        .range((order_id, u64::MIN)..=(order_id, u64::MAX))?
                        .filter_map(|entry| entry.ok().map(|(key, _)| key.value()))
                        .collect();
                    for key in history_keys {
                        history.remove(key)?;
                    }
                }
            }
            existed
        };
        txn.commit()?;
        if !existed {
            return Err(RepoError::NotFound(format!("Restaurant {} not found", id)));
        }
        Ok(true)
    }
}
