//! Restaurant Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Restaurant entity — the root every other resource is scoped under
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    /// Owning account in the external identity provider
    pub owner_user_id: Option<i64>,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    /// Logo image URL
    pub logo: Option<String>,
    /// Banner image URL
    pub banner_image: Option<String>,
    /// Creation time (ms since epoch)
    pub created_at: i64,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RestaurantCreate {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub owner_user_id: Option<i64>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub banner_image: Option<String>,
}

/// Update restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RestaurantUpdate {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    pub owner_user_id: Option<i64>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub banner_image: Option<String>,
}
