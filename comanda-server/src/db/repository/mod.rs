//! Repository Module
//!
//! CRUD access to the catalog tables. Every repository is a thin handle
//! over [`Storage`](crate::db::Storage); construction is free, handlers
//! build them per request.

// Catalog
pub mod category;
pub mod dining_table;
pub mod employee;
pub mod menu_item;
pub mod restaurant;

// Re-exports
pub use category::CategoryRepository;
pub use dining_table::DiningTableRepository;
pub use employee::EmployeeRepository;
pub use menu_item::MenuItemRepository;
pub use restaurant::RestaurantRepository;

use crate::db::StorageError;
use shared::AppError;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<redb::TransactionError> for RepoError {
    fn from(err: redb::TransactionError) -> Self {
        RepoError::Storage(err.into())
    }
}

impl From<redb::TableError> for RepoError {
    fn from(err: redb::TableError) -> Self {
        RepoError::Storage(err.into())
    }
}

impl From<redb::StorageError> for RepoError {
    fn from(err: redb::StorageError) -> Self {
        RepoError::Storage(err.into())
    }
}

impl From<redb::CommitError> for RepoError {
    fn from(err: redb::CommitError) -> Self {
        RepoError::Storage(err.into())
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Storage(err.into())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
