//! Menu Item Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Menu item entity
///
/// Prices are stored as f64 on the wire; all arithmetic over them goes
/// through decimal helpers to avoid float accumulation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    /// Restaurant reference
    pub restaurant_id: i64,
    /// Category reference (must belong to the same restaurant)
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    /// Image URL
    pub image: Option<String>,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuItemCreate {
    pub category_id: i64,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub image: Option<String>,
}

/// Update menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuItemUpdate {
    pub category_id: Option<i64>,
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub image: Option<String>,
}
