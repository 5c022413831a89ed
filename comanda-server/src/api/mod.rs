//! API 路由模块
//!
//! # 结构
//!
//! - [`restaurants`] - 餐厅管理接口
//! - [`categories`] - 分类管理接口
//! - [`employees`] - 员工管理接口
//! - [`tables`] - 桌台管理接口
//! - [`menu_items`] - 菜单管理接口
//! - [`orders`] - 订单接口 (生命周期 + 桌台流程)

pub mod categories;
pub mod employees;
pub mod menu_items;
pub mod orders;
pub mod restaurants;
pub mod tables;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResponse, AppResult};
