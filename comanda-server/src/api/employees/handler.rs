//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::EmployeeRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate};

/// GET /api/restaurants/{restaurant_id}/employees - 获取餐厅员工
pub async fn list(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<Employee>>>> {
    let repo = EmployeeRepository::new(state.storage.clone());
    let employees = repo.find_all(restaurant_id)?;
    Ok(ok(employees))
}

/// GET /api/restaurants/{restaurant_id}/employees/{id} - 获取单个员工
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<AppResponse<Employee>>> {
    let repo = EmployeeRepository::new(state.storage.clone());
    let employee = repo
        .find_by_id(restaurant_id, id)?
        .ok_or_else(|| AppError::not_found(format!("Employee {} not found", id)))?;
    Ok(ok(employee))
}

/// POST /api/restaurants/{restaurant_id}/employees - 创建员工
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<AppResponse<Employee>>> {
    payload.validate()?;
    let repo = EmployeeRepository::new(state.storage.clone());
    let employee = repo.create(restaurant_id, payload)?;
    Ok(ok_with_message(employee, "Employee created successfully"))
}

/// PUT /api/restaurants/{restaurant_id}/employees/{id} - 更新员工
pub async fn update(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<AppResponse<Employee>>> {
    payload.validate()?;
    let repo = EmployeeRepository::new(state.storage.clone());
    let employee = repo.update(restaurant_id, id, payload)?;
    Ok(ok_with_message(employee, "Employee updated successfully"))
}

/// DELETE /api/restaurants/{restaurant_id}/employees/{id} - 删除员工
pub async fn delete(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = EmployeeRepository::new(state.storage.clone());
    let result = repo.delete(restaurant_id, id)?;
    Ok(ok_with_message(result, "Employee deleted successfully"))
}
