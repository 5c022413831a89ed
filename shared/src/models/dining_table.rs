//! Dining Table Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Dining table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: i64,
    /// Restaurant reference
    pub restaurant_id: i64,
    /// Table number as shown on the floor
    pub number: i32,
    /// QR code payload printed on the table, if any
    pub qr_code: Option<String>,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiningTableCreate {
    #[validate(range(min = 1))]
    pub number: i32,
    pub qr_code: Option<String>,
}

/// Update dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiningTableUpdate {
    #[validate(range(min = 1))]
    pub number: Option<i32>,
    pub qr_code: Option<String>,
}
