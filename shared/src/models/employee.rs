//! Employee Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Employee entity (桌边点餐由员工录入时引用)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    /// Restaurant reference
    pub restaurant_id: i64,
    /// Account in the external identity provider
    pub user_id: Option<i64>,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmployeeCreate {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub user_id: Option<i64>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
}

/// Update employee payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmployeeUpdate {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    pub user_id: Option<i64>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
}
