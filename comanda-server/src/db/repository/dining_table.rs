//! Dining Table Repository

use redb::ReadableTable;

use super::{RepoError, RepoResult};
use crate::db::{DINING_TABLES_TABLE, Storage};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use shared::snowflake_id;

#[derive(Clone)]
pub struct DiningTableRepository {
    storage: Storage,
}

impl DiningTableRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Find all tables of a restaurant, ordered by table number
    pub fn find_all(&self, restaurant_id: i64) -> RepoResult<Vec<DiningTable>> {
        let txn = self.storage.begin_read()?;
        let table = txn.open_table(DINING_TABLES_TABLE)?;
        let mut tables = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let dining_table: DiningTable = serde_json::from_slice(value.value())?;
            if dining_table.restaurant_id == restaurant_id {
                tables.push(dining_table);
            }
        }
        tables.sort_by_key(|t| t.number);
        Ok(tables)
    }

    /// Find table by id, scoped to a restaurant
    pub fn find_by_id(&self, restaurant_id: i64, id: i64) -> RepoResult<Option<DiningTable>> {
        let txn = self.storage.begin_read()?;
        let table = txn.open_table(DINING_TABLES_TABLE)?;
        match table.get(id)? {
            Some(value) => {
                let dining_table: DiningTable = serde_json::from_slice(value.value())?;
                Ok((dining_table.restaurant_id == restaurant_id).then_some(dining_table))
            }
            None => Ok(None),
        }
    }

    /// Create a new dining table
    pub fn create(&self, restaurant_id: i64, data: DiningTableCreate) -> RepoResult<DiningTable> {
        // Check duplicate number in same restaurant
        if self
            .find_all(restaurant_id)?
            .iter()
            .any(|t| t.number == data.number)
        {
            return Err(RepoError::Duplicate(format!(
                "Table {} already exists in this restaurant",
                data.number
            )));
        }

        let dining_table = DiningTable {
            id: snowflake_id(),
            restaurant_id,
            number: data.number,
            qr_code: data.qr_code,
        };

        let txn = self.storage.begin_write()?;
        {
            let mut table = txn.open_table(DINING_TABLES_TABLE)?;
            table.insert(
                dining_table.id,
                serde_json::to_vec(&dining_table)?.as_slice(),
            )?;
        }
        txn.commit()?;
        Ok(dining_table)
    }

    /// Update a dining table
    pub fn update(
        &self,
        restaurant_id: i64,
        id: i64,
        data: DiningTableUpdate,
    ) -> RepoResult<DiningTable> {
        let existing = self
            .find_by_id(restaurant_id, id)?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;

        // Check duplicate number if changing it
        if let Some(number) = data.number
            && number != existing.number
            && self
                .find_all(restaurant_id)?
                .iter()
                .any(|t| t.number == number)
        {
            return Err(RepoError::Duplicate(format!(
                "Table {} already exists in this restaurant",
                number
            )));
        }

        let updated = DiningTable {
            id: existing.id,
            restaurant_id: existing.restaurant_id,
            number: data.number.unwrap_or(existing.number),
            qr_code: data.qr_code.or(existing.qr_code),
        };

        let txn = self.storage.begin_write()?;
        {
            let mut table = txn.open_table(DINING_TABLES_TABLE)?;
            table.insert(id, serde_json::to_vec(&updated)?.as_slice())?;
        }
        txn.commit()?;
        Ok(updated)
    }

    /// Delete a dining table
    pub fn delete(&self, restaurant_id: i64, id: i64) -> RepoResult<bool> {
        self.find_by_id(restaurant_id, id)?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;

        let txn = self.storage.begin_write()?;
        {
            let mut table = txn.open_table(DINING_TABLES_TABLE)?;
            table.remove(id)?;
        }
        txn.commit()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_number_rejected() {
        let repo = DiningTableRepository::new(Storage::open_in_memory().unwrap());
        repo.create(
            1,
            DiningTableCreate {
                number: 4,
                qr_code: None,
            },
        )
        .unwrap();
        let result = repo.create(
            1,
            DiningTableCreate {
                number: 4,
                qr_code: None,
            },
        );
        assert!(matches!(result, Err(RepoError::Duplicate(_))));

        // Same number in another restaurant is fine
        assert!(
            repo.create(
                2,
                DiningTableCreate {
                    number: 4,
                    qr_code: None,
                },
            )
            .is_ok()
        );
    }
}
