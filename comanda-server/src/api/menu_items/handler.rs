//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::MenuItemRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};

/// GET /api/restaurants/{restaurant_id}/menu-items - 获取餐厅菜单
pub async fn list(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<MenuItem>>>> {
    let repo = MenuItemRepository::new(state.storage.clone());
    let items = repo.find_all(restaurant_id)?;
    Ok(ok(items))
}

/// GET /api/restaurants/{restaurant_id}/menu-items/{id} - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    let repo = MenuItemRepository::new(state.storage.clone());
    let item = repo
        .find_by_id(restaurant_id, id)?
        .ok_or_else(|| AppError::not_found(format!("Menu item {} not found", id)))?;
    Ok(ok(item))
}

/// POST /api/restaurants/{restaurant_id}/menu-items - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    payload.validate()?;
    let repo = MenuItemRepository::new(state.storage.clone());
    let item = repo.create(restaurant_id, payload)?;
    Ok(ok_with_message(item, "Menu item created successfully"))
}

/// PUT /api/restaurants/{restaurant_id}/menu-items/{id} - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    payload.validate()?;
    let repo = MenuItemRepository::new(state.storage.clone());
    let item = repo.update(restaurant_id, id, payload)?;
    Ok(ok_with_message(item, "Menu item updated successfully"))
}

/// DELETE /api/restaurants/{restaurant_id}/menu-items/{id} - 删除菜品
pub async fn delete(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = MenuItemRepository::new(state.storage.clone());
    let result = repo.delete(restaurant_id, id)?;
    Ok(ok_with_message(result, "Menu item deleted successfully"))
}
