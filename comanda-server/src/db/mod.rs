//! redb-based persistence gateway
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `restaurants` | `id` | `Restaurant` | Catalog root |
//! | `categories` | `id` | `Category` | Menu categories |
//! | `employees` | `id` | `Employee` | Staff |
//! | `dining_tables` | `id` | `DiningTable` | Floor tables |
//! | `menu_items` | `id` | `MenuItem` | Menu |
//! | `orders` | `id` | `Order` | Order head records |
//! | `order_items` | `(order_id, item_id)` | `OrderItem` | Line items, range-scanned per order |
//! | `status_history` | `(order_id, seq)` | `OrderStatusHistory` | Append-only status ledger |
//! | `sequence_counter` | `&str` | `u64` | Monotone counters |
//!
//! All values are JSON-serialized. Every mutation runs inside one write
//! transaction; the commit is the atomicity boundary the lifecycle engine
//! relies on (item delete + order cancel + history append either all land
//! or none do).

pub mod repository;

use redb::{
    Database as RedbDatabase, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition,
    WriteTransaction,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Catalog tables: key = entity id, value = JSON-serialized entity
pub const RESTAURANTS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("restaurants");
pub const CATEGORIES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("categories");
pub const EMPLOYEES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("employees");
pub const DINING_TABLES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("dining_tables");
pub const MENU_ITEMS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("menu_items");

/// Order head records: key = order id, value = JSON-serialized Order
pub const ORDERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("orders");

/// Line items: key = (order_id, item_id) so one order's items are a
/// contiguous key range
pub const ORDER_ITEMS_TABLE: TableDefinition<(i64, i64), &[u8]> =
    TableDefinition::new("order_items");

/// Status history: key = (order_id, seq), seq is globally monotone so the
/// range scan per order is already in append order
pub const STATUS_HISTORY_TABLE: TableDefinition<(i64, u64), &[u8]> =
    TableDefinition::new("status_history");

/// Monotone counters: key = counter name, value = last issued value
pub const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const HISTORY_SEQ_KEY: &str = "history_seq";

const ALL_BLOB_TABLES: [&TableDefinition<i64, &[u8]>; 6] = [
    &RESTAURANTS_TABLE,
    &CATEGORIES_TABLE,
    &EMPLOYEES_TABLE,
    &DINING_TABLES_TABLE,
    &MENU_ITEMS_TABLE,
    &ORDERS_TABLE,
];

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence gateway backed by redb
///
/// Cheap to clone; all holders share one database handle.
#[derive(Clone)]
pub struct Storage {
    db: Arc<RedbDatabase>,
}

impl Storage {
    /// Open or create the database at the given path
    ///
    /// redb commits with `Durability::Immediate` by default: once `commit()`
    /// returns, the data survives power loss and the file is always in a
    /// consistent state.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = RedbDatabase::create(path)?;
        Self::init_tables(&db)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (tests and ephemeral dev runs)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = RedbDatabase::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init_tables(&db)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Pre-create every table so later read transactions never hit
    /// TableDoesNotExist
    fn init_tables(db: &RedbDatabase) -> StorageResult<()> {
        let write_txn = db.begin_write()?;
        {
            for table in ALL_BLOB_TABLES {
                let _ = write_txn.open_table(*table)?;
            }
            let _ = write_txn.open_table(ORDER_ITEMS_TABLE)?;
            let _ = write_txn.open_table(STATUS_HISTORY_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(HISTORY_SEQ_KEY)?.is_none() {
                seq_table.insert(HISTORY_SEQ_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction (consistent snapshot)
    pub fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    /// Increment and return the history sequence number (within transaction)
    pub fn next_history_seq(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table
            .get(HISTORY_SEQ_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let next = current + 1;
        table.insert(HISTORY_SEQ_KEY, next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_in_memory_initializes_tables() {
        let storage = Storage::open_in_memory().unwrap();
        // A read transaction must be able to open every table right away
        let txn = storage.begin_read().unwrap();
        assert!(txn.open_table(ORDERS_TABLE).is_ok());
        assert!(txn.open_table(ORDER_ITEMS_TABLE).is_ok());
        assert!(txn.open_table(STATUS_HISTORY_TABLE).is_ok());
    }

    #[test]
    fn history_seq_is_monotone() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let a = storage.next_history_seq(&txn).unwrap();
        let b = storage.next_history_seq(&txn).unwrap();
        assert!(b > a);
        txn.commit().unwrap();

        // Counter survives the transaction boundary
        let txn = storage.begin_write().unwrap();
        let c = storage.next_history_seq(&txn).unwrap();
        assert!(c > b);
        txn.commit().unwrap();
    }

    #[test]
    fn reopen_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comanda.db");
        {
            let storage = Storage::open(&path).unwrap();
            let txn = storage.begin_write().unwrap();
            {
                let mut table = txn.open_table(RESTAURANTS_TABLE).unwrap();
                table.insert(1i64, b"{}".as_slice()).unwrap();
            }
            txn.commit().unwrap();
        }
        let storage = Storage::open(&path).unwrap();
        let txn = storage.begin_read().unwrap();
        let table = txn.open_table(RESTAURANTS_TABLE).unwrap();
        assert!(table.get(1i64).unwrap().is_some());
    }
}
