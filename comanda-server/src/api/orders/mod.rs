//! Order API Module
//!
//! Two surfaces over the same engine:
//!
//! - order-centric: create/list/get/update/cancel plus per-item cancel
//! - table-centric: the walk-up flow (latest order, create-or-update,
//!   set-paid), where a table behaves as one open tab

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/restaurants/{restaurant_id}/orders", order_routes())
        .nest(
            "/api/restaurants/{restaurant_id}/tables/{table_id}/orders",
            table_routes(),
        )
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).patch(handler::update))
        .route("/{id}/cancel", post(handler::cancel))
        .route(
            "/{id}/items/{item_id}/cancel",
            post(handler::cancel_item),
        )
}

fn table_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_for_table))
        .route("/latest", get(handler::latest_for_table))
        .route("/current", post(handler::create_or_update_for_table))
        .route("/paid", patch(handler::set_paid_for_latest))
}
