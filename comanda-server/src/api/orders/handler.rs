//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};
use shared::order::{
    CancelItemOutcome, OrderCreate, OrderDetail, OrderPaidUpdate, OrderSummary, OrderUpdate,
    TableOrder,
};

// ========== Order-centric surface ==========

/// GET /api/restaurants/{restaurant_id}/orders - 餐厅订单列表 (新的在前)
pub async fn list(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<OrderSummary>>>> {
    let orders = state.orders.list_orders(restaurant_id)?;
    Ok(ok(orders))
}

/// POST /api/restaurants/{restaurant_id}/orders - 创建订单
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    payload.validate()?;
    let order = state.orders.create_order(restaurant_id, payload)?;
    Ok(ok_with_message(order, "Order created successfully"))
}

/// GET /api/restaurants/{restaurant_id}/orders/{id} - 订单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let order = state.orders.get_order(restaurant_id, id)?;
    Ok(ok(order))
}

/// PATCH /api/restaurants/{restaurant_id}/orders/{id} - 更新订单
/// (状态/支付/桌台/整单换菜，终态订单拒绝)
pub async fn update(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    payload.validate()?;
    let order = state.orders.update_order(restaurant_id, id, payload).await?;
    Ok(ok_with_message(order, "Order updated successfully"))
}

/// POST /api/restaurants/{restaurant_id}/orders/{id}/cancel - 取消订单
pub async fn cancel(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let order = state.orders.cancel_order(restaurant_id, id).await?;
    Ok(ok_with_message(order, "Order cancelled successfully"))
}

/// POST /api/restaurants/{restaurant_id}/orders/{id}/items/{item_id}/cancel
/// - 取消单个菜品；删除最后一个菜品时整单联动取消
pub async fn cancel_item(
    State(state): State<ServerState>,
    Path((restaurant_id, id, item_id)): Path<(i64, i64, i64)>,
) -> AppResult<Json<AppResponse<CancelItemOutcome>>> {
    let outcome = state.orders.cancel_item(restaurant_id, id, item_id).await?;
    let message = if outcome.order_cancelled {
        "Order item cancelled; the order was cancelled as no items remain"
    } else {
        "Order item cancelled successfully"
    };
    Ok(ok_with_message(outcome, message))
}

// ========== Table-centric surface ==========

/// GET /api/restaurants/{restaurant_id}/tables/{table_id}/orders - 桌台全部订单
pub async fn list_for_table(
    State(state): State<ServerState>,
    Path((restaurant_id, table_id)): Path<(i64, i64)>,
) -> AppResult<Json<AppResponse<Vec<TableOrder>>>> {
    let orders = state.resolver.orders_for_table(restaurant_id, table_id)?;
    Ok(ok(orders))
}

/// GET /api/restaurants/{restaurant_id}/tables/{table_id}/orders/latest
/// - 桌台最新订单 (无订单时 404)
pub async fn latest_for_table(
    State(state): State<ServerState>,
    Path((restaurant_id, table_id)): Path<(i64, i64)>,
) -> AppResult<Json<AppResponse<TableOrder>>> {
    let order = state
        .resolver
        .latest_view(restaurant_id, table_id)?
        .ok_or_else(|| AppError::not_found("No orders found for this table"))?;
    Ok(ok(order))
}

/// POST /api/restaurants/{restaurant_id}/tables/{table_id}/orders/current
/// - 追加到未支付的最新订单，否则开新订单
pub async fn create_or_update_for_table(
    State(state): State<ServerState>,
    Path((restaurant_id, table_id)): Path<(i64, i64)>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<AppResponse<TableOrder>>> {
    payload.validate()?;
    let (order, created) = state
        .resolver
        .create_or_update(restaurant_id, table_id, payload)
        .await?;
    let message = if created {
        "Order created successfully"
    } else {
        "Order updated successfully"
    };
    Ok(ok_with_message(order, message))
}

/// PATCH /api/restaurants/{restaurant_id}/tables/{table_id}/orders/paid
/// - 设置最新订单的支付状态
pub async fn set_paid_for_latest(
    State(state): State<ServerState>,
    Path((restaurant_id, table_id)): Path<(i64, i64)>,
    Json(payload): Json<OrderPaidUpdate>,
) -> AppResult<Json<AppResponse<TableOrder>>> {
    let order = state
        .resolver
        .set_paid_for_latest(restaurant_id, table_id, payload.paid)
        .await?;
    Ok(ok(order))
}
