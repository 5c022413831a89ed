//! Append-only status history ledger
//!
//! The public surface is exactly [`append`] and [`list_for`]: entries are
//! never updated or deleted, enforced by omission rather than a runtime
//! check. Entries are keyed `(order_id, seq)` with a globally monotone
//! `seq`, so the per-order range scan comes back in append order.

use redb::{ReadTransaction, ReadableTable, WriteTransaction};

use crate::db::{STATUS_HISTORY_TABLE, Storage, StorageResult};
use shared::order::{OrderStatus, OrderStatusHistory};
use shared::snowflake_id;

/// Append one status entry for an order, inside an open write transaction
///
/// The caller decides whether a transition warrants an entry (no entry when
/// the status did not change); this function only records.
pub fn append(
    storage: &Storage,
    txn: &WriteTransaction,
    order_id: i64,
    status: OrderStatus,
    timestamp: i64,
) -> StorageResult<OrderStatusHistory> {
    let entry = OrderStatusHistory {
        id: snowflake_id(),
        order_id,
        status,
        timestamp,
    };
    let seq = storage.next_history_seq(txn)?;
    let mut table = txn.open_table(STATUS_HISTORY_TABLE)?;
    table.insert((order_id, seq), serde_json::to_vec(&entry)?.as_slice())?;
    Ok(entry)
}

/// List an order's history in append order (ascending)
pub fn list_for(txn: &ReadTransaction, order_id: i64) -> StorageResult<Vec<OrderStatusHistory>> {
    let table = txn.open_table(STATUS_HISTORY_TABLE)?;
    let mut entries = Vec::new();
    for entry in table.range((order_id, u64::MIN)..=(order_id, u64::MAX))? {
        let (_, value) = entry?;
        entries.push(serde_json::from_slice(value.value())?);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::now_millis;

    #[test]
    fn entries_come_back_in_append_order() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        append(&storage, &txn, 7, OrderStatus::Pending, now_millis()).unwrap();
        append(&storage, &txn, 7, OrderStatus::InProgress, now_millis()).unwrap();
        append(&storage, &txn, 7, OrderStatus::Completed, now_millis()).unwrap();
        txn.commit().unwrap();

        let txn = storage.begin_read().unwrap();
        let entries = list_for(&txn, 7).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].status, OrderStatus::Pending);
        assert_eq!(entries[1].status, OrderStatus::InProgress);
        assert_eq!(entries[2].status, OrderStatus::Completed);
    }

    #[test]
    fn orders_do_not_share_history() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        append(&storage, &txn, 1, OrderStatus::Pending, now_millis()).unwrap();
        append(&storage, &txn, 2, OrderStatus::Pending, now_millis()).unwrap();
        append(&storage, &txn, 2, OrderStatus::Cancelled, now_millis()).unwrap();
        txn.commit().unwrap();

        let txn = storage.begin_read().unwrap();
        assert_eq!(list_for(&txn, 1).unwrap().len(), 1);
        assert_eq!(list_for(&txn, 2).unwrap().len(), 2);
        assert!(list_for(&txn, 3).unwrap().is_empty());
    }
}
