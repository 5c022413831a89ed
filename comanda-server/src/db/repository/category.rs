//! Category Repository

use redb::ReadableTable;

use super::{RepoError, RepoResult};
use crate::db::{CATEGORIES_TABLE, MENU_ITEMS_TABLE, Storage};
use shared::models::{Category, CategoryCreate, CategoryUpdate, MenuItem};
use shared::snowflake_id;

#[derive(Clone)]
pub struct CategoryRepository {
    storage: Storage,
}

impl CategoryRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Find all categories of a restaurant
    pub fn find_all(&self, restaurant_id: i64) -> RepoResult<Vec<Category>> {
        let txn = self.storage.begin_read()?;
        let table = txn.open_table(CATEGORIES_TABLE)?;
        let mut categories = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let category: Category = serde_json::from_slice(value.value())?;
            if category.restaurant_id == restaurant_id {
                categories.push(category);
            }
        }
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    /// Find category by id, scoped to a restaurant
    pub fn find_by_id(&self, restaurant_id: i64, id: i64) -> RepoResult<Option<Category>> {
        let txn = self.storage.begin_read()?;
        let table = txn.open_table(CATEGORIES_TABLE)?;
        match table.get(id)? {
            Some(value) => {
                let category: Category = serde_json::from_slice(value.value())?;
                Ok((category.restaurant_id == restaurant_id).then_some(category))
            }
            None => Ok(None),
        }
    }

    /// Create a new category under a restaurant
    pub fn create(&self, restaurant_id: i64, data: CategoryCreate) -> RepoResult<Category> {
        if self
            .find_all(restaurant_id)?
            .iter()
            .any(|c| c.name == data.name)
        {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                data.name
            )));
        }

        let category = Category {
            id: snowflake_id(),
            restaurant_id,
            name: data.name,
        };

        let txn = self.storage.begin_write()?;
        {
            let mut table = txn.open_table(CATEGORIES_TABLE)?;
            table.insert(category.id, serde_json::to_vec(&category)?.as_slice())?;
        }
        txn.commit()?;
        Ok(category)
    }

    /// Update a category
    pub fn update(&self, restaurant_id: i64, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
        let existing = self
            .find_by_id(restaurant_id, id)?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        let updated = Category {
            id: existing.id,
            restaurant_id: existing.restaurant_id,
            name: data.name.unwrap_or(existing.name),
        };

        let txn = self.storage.begin_write()?;
        {
            let mut table = txn.open_table(CATEGORIES_TABLE)?;
            table.insert(id, serde_json::to_vec(&updated)?.as_slice())?;
        }
        txn.commit()?;
        Ok(updated)
    }

    /// Delete a category together with its menu items
    pub fn delete(&self, restaurant_id: i64, id: i64) -> RepoResult<bool> {
        self.find_by_id(restaurant_id, id)?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        let txn = self.storage.begin_write()?;
        {
            let mut table = txn.open_table(CATEGORIES_TABLE)?;
            table.remove(id)?;

            let mut menu_items = txn.open_table(MENU_ITEMS_TABLE)?;
            let item_ids: Vec<i64> = menu_items
                .iter()?
                .filter_map(|entry| {
                    let (key, value) = entry.ok()?;
                    let item: MenuItem = serde_json::from_slice(value.value()).ok()?;
                    (item.category_id == id).then_some(key.value())
                })
                .collect();
            for item_id in item_ids {
                menu_items.remove(item_id)?;
            }
        }
        txn.commit()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_by_restaurant() {
        let storage = Storage::open_in_memory().unwrap();
        let repo = CategoryRepository::new(storage);
        let a = repo
            .create(
                1,
                CategoryCreate {
                    name: "Tapas".to_string(),
                },
            )
            .unwrap();
        repo.create(
            2,
            CategoryCreate {
                name: "Postres".to_string(),
            },
        )
        .unwrap();

        assert_eq!(repo.find_all(1).unwrap().len(), 1);
        // Wrong restaurant never sees the category
        assert!(repo.find_by_id(2, a.id).unwrap().is_none());
    }

    #[test]
    fn duplicate_name_rejected() {
        let storage = Storage::open_in_memory().unwrap();
        let repo = CategoryRepository::new(storage);
        repo.create(
            1,
            CategoryCreate {
                name: "Tapas".to_string(),
            },
        )
        .unwrap();
        let result = repo.create(
            1,
            CategoryCreate {
                name: "Tapas".to_string(),
            },
        );
        assert!(matches!(result, Err(RepoError::Duplicate(_))));
    }
}
