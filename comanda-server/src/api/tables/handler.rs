//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::DiningTableRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};

/// GET /api/restaurants/{restaurant_id}/tables - 获取餐厅桌台
pub async fn list(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<DiningTable>>>> {
    let repo = DiningTableRepository::new(state.storage.clone());
    let tables = repo.find_all(restaurant_id)?;
    Ok(ok(tables))
}

/// GET /api/restaurants/{restaurant_id}/tables/{id} - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<AppResponse<DiningTable>>> {
    let repo = DiningTableRepository::new(state.storage.clone());
    let table = repo
        .find_by_id(restaurant_id, id)?
        .ok_or_else(|| AppError::not_found(format!("Table {} not found", id)))?;
    Ok(ok(table))
}

/// POST /api/restaurants/{restaurant_id}/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<AppResponse<DiningTable>>> {
    payload.validate()?;
    let repo = DiningTableRepository::new(state.storage.clone());
    let table = repo.create(restaurant_id, payload)?;
    Ok(ok_with_message(table, "Table created successfully"))
}

/// PUT /api/restaurants/{restaurant_id}/tables/{id} - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<AppResponse<DiningTable>>> {
    payload.validate()?;
    let repo = DiningTableRepository::new(state.storage.clone());
    let table = repo.update(restaurant_id, id, payload)?;
    Ok(ok_with_message(table, "Table updated successfully"))
}

/// DELETE /api/restaurants/{restaurant_id}/tables/{id} - 删除桌台
pub async fn delete(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = DiningTableRepository::new(state.storage.clone());
    let result = repo.delete(restaurant_id, id)?;
    Ok(ok_with_message(result, "Table deleted successfully"))
}
