//! Order engine errors

use crate::db::StorageError;
use shared::AppError;
use thiserror::Error;

/// Errors surfaced by the order lifecycle engine
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Order item not found: {0}")]
    ItemNotFound(i64),

    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(i64),

    #[error("Table not found: {0}")]
    TableNotFound(i64),

    #[error("No orders found for table {0}")]
    NoOrdersForTable(i64),

    #[error("Order already completed: {0}")]
    OrderAlreadyCompleted(i64),

    #[error("Order already cancelled: {0}")]
    OrderAlreadyCancelled(i64),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl OrderError {
    /// Whether retrying the whole operation may succeed
    ///
    /// Only raw storage failures are transient; every business rejection is
    /// deterministic and must not be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, OrderError::Storage(_))
    }
}

impl From<redb::TransactionError> for OrderError {
    fn from(err: redb::TransactionError) -> Self {
        OrderError::Storage(err.into())
    }
}

impl From<redb::TableError> for OrderError {
    fn from(err: redb::TableError) -> Self {
        OrderError::Storage(err.into())
    }
}

impl From<redb::StorageError> for OrderError {
    fn from(err: redb::StorageError) -> Self {
        OrderError::Storage(err.into())
    }
}

impl From<redb::CommitError> for OrderError {
    fn from(err: redb::CommitError) -> Self {
        OrderError::Storage(err.into())
    }
}

impl From<serde_json::Error> for OrderError {
    fn from(err: serde_json::Error) -> Self {
        OrderError::Storage(err.into())
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            // Reaches the caller only after the engine's bounded retries
            OrderError::Storage(e) => AppError::Storage(e.to_string()),
            OrderError::OrderNotFound(id) => AppError::NotFound(format!("Order {} not found", id)),
            OrderError::ItemNotFound(id) => {
                AppError::NotFound(format!("Order item {} not found", id))
            }
            OrderError::RestaurantNotFound(id) => {
                AppError::NotFound(format!("Restaurant {} not found", id))
            }
            OrderError::TableNotFound(id) => AppError::NotFound(format!("Table {} not found", id)),
            OrderError::NoOrdersForTable(id) => {
                AppError::NotFound(format!("No orders found for table {}", id))
            }
            OrderError::OrderAlreadyCompleted(id) => {
                AppError::InvalidState(format!("Order {} is already completed", id))
            }
            OrderError::OrderAlreadyCancelled(id) => {
                AppError::InvalidState(format!("Order {} is already cancelled", id))
            }
            OrderError::Validation(msg) => AppError::Validation(msg),
        }
    }
}
