//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::RestaurantRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};
use shared::models::{Restaurant, RestaurantCreate, RestaurantUpdate};

/// Query params for listing restaurants
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Name substring filter
    pub search: Option<String>,
}

/// GET /api/restaurants - 获取所有餐厅 (支持按名称搜索)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Restaurant>>>> {
    let repo = RestaurantRepository::new(state.storage.clone());
    let restaurants = repo.find_all(query.search.as_deref())?;
    Ok(ok(restaurants))
}

/// GET /api/restaurants/{id} - 获取单个餐厅
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Restaurant>>> {
    let repo = RestaurantRepository::new(state.storage.clone());
    let restaurant = repo
        .find_by_id(id)?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {} not found", id)))?;
    Ok(ok(restaurant))
}

/// POST /api/restaurants - 创建餐厅
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<Json<AppResponse<Restaurant>>> {
    payload.validate()?;
    let repo = RestaurantRepository::new(state.storage.clone());
    let restaurant = repo.create(payload)?;
    Ok(ok_with_message(restaurant, "Restaurant created successfully"))
}

/// PUT /api/restaurants/{id} - 更新餐厅
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RestaurantUpdate>,
) -> AppResult<Json<AppResponse<Restaurant>>> {
    payload.validate()?;
    let repo = RestaurantRepository::new(state.storage.clone());
    let restaurant = repo.update(id, payload)?;
    Ok(ok_with_message(restaurant, "Restaurant updated successfully"))
}

/// DELETE /api/restaurants/{id} - 删除餐厅及其全部数据
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = RestaurantRepository::new(state.storage.clone());
    let result = repo.delete(id)?;
    Ok(ok_with_message(result, "Restaurant deleted successfully"))
}
