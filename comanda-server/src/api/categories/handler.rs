//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::CategoryRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

/// GET /api/restaurants/{restaurant_id}/categories - 获取餐厅分类
pub async fn list(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<Category>>>> {
    let repo = CategoryRepository::new(state.storage.clone());
    let categories = repo.find_all(restaurant_id)?;
    Ok(ok(categories))
}

/// GET /api/restaurants/{restaurant_id}/categories/{id} - 获取单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<AppResponse<Category>>> {
    let repo = CategoryRepository::new(state.storage.clone());
    let category = repo
        .find_by_id(restaurant_id, id)?
        .ok_or_else(|| AppError::not_found(format!("Category {} not found", id)))?;
    Ok(ok(category))
}

/// POST /api/restaurants/{restaurant_id}/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<AppResponse<Category>>> {
    payload.validate()?;
    let repo = CategoryRepository::new(state.storage.clone());
    let category = repo.create(restaurant_id, payload)?;
    Ok(ok_with_message(category, "Category created successfully"))
}

/// PUT /api/restaurants/{restaurant_id}/categories/{id} - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<AppResponse<Category>>> {
    payload.validate()?;
    let repo = CategoryRepository::new(state.storage.clone());
    let category = repo.update(restaurant_id, id, payload)?;
    Ok(ok_with_message(category, "Category updated successfully"))
}

/// DELETE /api/restaurants/{restaurant_id}/categories/{id} - 删除分类 (级联菜单项)
pub async fn delete(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = CategoryRepository::new(state.storage.clone());
    let result = repo.delete(restaurant_id, id)?;
    Ok(ok_with_message(result, "Category deleted successfully"))
}
