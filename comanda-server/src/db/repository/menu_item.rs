//! Menu Item Repository

use redb::ReadableTable;

use super::{RepoError, RepoResult};
use crate::db::{CATEGORIES_TABLE, MENU_ITEMS_TABLE, Storage};
use shared::models::{Category, MenuItem, MenuItemCreate, MenuItemUpdate};
use shared::snowflake_id;

#[derive(Clone)]
pub struct MenuItemRepository {
    storage: Storage,
}

impl MenuItemRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Find all menu items of a restaurant
    pub fn find_all(&self, restaurant_id: i64) -> RepoResult<Vec<MenuItem>> {
        let txn = self.storage.begin_read()?;
        let table = txn.open_table(MENU_ITEMS_TABLE)?;
        let mut items = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let item: MenuItem = serde_json::from_slice(value.value())?;
            if item.restaurant_id == restaurant_id {
                items.push(item);
            }
        }
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    /// Find menu item by id, scoped to a restaurant
    pub fn find_by_id(&self, restaurant_id: i64, id: i64) -> RepoResult<Option<MenuItem>> {
        let txn = self.storage.begin_read()?;
        let table = txn.open_table(MENU_ITEMS_TABLE)?;
        match table.get(id)? {
            Some(value) => {
                let item: MenuItem = serde_json::from_slice(value.value())?;
                Ok((item.restaurant_id == restaurant_id).then_some(item))
            }
            None => Ok(None),
        }
    }

    /// Create a new menu item under a restaurant
    ///
    /// The referenced category must belong to the same restaurant.
    pub fn create(&self, restaurant_id: i64, data: MenuItemCreate) -> RepoResult<MenuItem> {
        self.check_category(restaurant_id, data.category_id)?;

        let item = MenuItem {
            id: snowflake_id(),
            restaurant_id,
            category_id: data.category_id,
            name: data.name,
            description: data.description,
            price: data.price,
            image: data.image,
        };

        let txn = self.storage.begin_write()?;
        {
            let mut table = txn.open_table(MENU_ITEMS_TABLE)?;
            table.insert(item.id, serde_json::to_vec(&item)?.as_slice())?;
        }
        txn.commit()?;
        Ok(item)
    }

    /// Update a menu item
    pub fn update(&self, restaurant_id: i64, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let existing = self
            .find_by_id(restaurant_id, id)?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        if let Some(category_id) = data.category_id {
            self.check_category(restaurant_id, category_id)?;
        }

        let updated = MenuItem {
            id: existing.id,
            restaurant_id: existing.restaurant_id,
            category_id: data.category_id.unwrap_or(existing.category_id),
            name: data.name.unwrap_or(existing.name),
            description: data.description.or(existing.description),
            price: data.price.unwrap_or(existing.price),
            image: data.image.or(existing.image),
        };

        let txn = self.storage.begin_write()?;
        {
            let mut table = txn.open_table(MENU_ITEMS_TABLE)?;
            table.insert(id, serde_json::to_vec(&updated)?.as_slice())?;
        }
        txn.commit()?;
        Ok(updated)
    }

    /// Delete a menu item
    pub fn delete(&self, restaurant_id: i64, id: i64) -> RepoResult<bool> {
        self.find_by_id(restaurant_id, id)?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        let txn = self.storage.begin_write()?;
        {
            let mut table = txn.open_table(MENU_ITEMS_TABLE)?;
            table.remove(id)?;
        }
        txn.commit()?;
        Ok(true)
    }

    fn check_category(&self, restaurant_id: i64, category_id: i64) -> RepoResult<()> {
        let txn = self.storage.begin_read()?;
        let table = txn.open_table(CATEGORIES_TABLE)?;
        let category: Option<Category> = match table.get(category_id)? {
            Some(value) => Some(serde_json::from_slice(value.value())?),
            None => None,
        };
        match category {
            Some(c) if c.restaurant_id == restaurant_id => Ok(()),
            _ => Err(RepoError::Validation(format!(
                "Category {} does not belong to restaurant {}",
                category_id, restaurant_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::CategoryRepository;
    use shared::models::CategoryCreate;

    fn setup() -> (MenuItemRepository, i64) {
        let storage = Storage::open_in_memory().unwrap();
        let categories = CategoryRepository::new(storage.clone());
        let category = categories
            .create(
                1,
                CategoryCreate {
                    name: "Tapas".to_string(),
                },
            )
            .unwrap();
        (MenuItemRepository::new(storage), category.id)
    }

    fn item_payload(category_id: i64, name: &str, price: f64) -> MenuItemCreate {
        MenuItemCreate {
            category_id,
            name: name.to_string(),
            description: None,
            price,
            image: None,
        }
    }

    #[test]
    fn create_requires_category_in_same_restaurant() {
        let (repo, category_id) = setup();
        assert!(
            repo.create(1, item_payload(category_id, "Croquetas", 6.5))
                .is_ok()
        );
        // Category belongs to restaurant 1, not 2
        let result = repo.create(2, item_payload(category_id, "Croquetas", 6.5));
        assert!(matches!(result, Err(RepoError::Validation(_))));
    }

    #[test]
    fn update_price() {
        let (repo, category_id) = setup();
        let item = repo
            .create(1, item_payload(category_id, "Croquetas", 6.5))
            .unwrap();
        let updated = repo
            .update(
                1,
                item.id,
                MenuItemUpdate {
                    category_id: None,
                    name: None,
                    description: None,
                    price: Some(7.0),
                    image: None,
                },
            )
            .unwrap();
        assert_eq!(updated.price, 7.0);
        assert_eq!(updated.name, "Croquetas");
    }
}
