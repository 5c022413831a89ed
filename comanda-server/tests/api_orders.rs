//! Integration tests for the HTTP order surface

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use comanda_server::core::server::app;
use comanda_server::{Config, ServerState};

fn setup() -> Router {
    let config = Config::with_overrides("/tmp/comanda-test", 0);
    let state = ServerState::in_memory(config).unwrap();
    app(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Create restaurant + table + category + menu item, return their ids
async fn seed(app: &Router) -> (i64, i64, i64) {
    let (status, body) = send(
        app,
        "POST",
        "/api/restaurants",
        Some(json!({ "name": "Casa Pepe" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let restaurant_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        app,
        "POST",
        &format!("/api/restaurants/{restaurant_id}/tables"),
        Some(json!({ "number": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let table_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(
        app,
        "POST",
        &format!("/api/restaurants/{restaurant_id}/categories"),
        Some(json!({ "name": "Tapas" })),
    )
    .await;
    let category_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        app,
        "POST",
        &format!("/api/restaurants/{restaurant_id}/menu-items"),
        Some(json!({ "category_id": category_id, "name": "Croquetas", "price": 6.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let menu_item_id = body["data"]["id"].as_i64().unwrap();

    (restaurant_id, table_id, menu_item_id)
}

#[tokio::test]
async fn create_and_fetch_order() {
    let app = setup();
    let (restaurant_id, table_id, menu_item_id) = seed(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/restaurants/{restaurant_id}/orders"),
        Some(json!({
            "table_id": table_id,
            "items": [{ "menu_item_id": menu_item_id, "quantity": 2 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "E0000");
    let order = &body["data"];
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["paid"], false);
    assert_eq!(order["total_cost"], 13.0);
    assert_eq!(order["status_history"].as_array().unwrap().len(), 1);

    let order_id = order["id"].as_i64().unwrap();
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/restaurants/{restaurant_id}/orders/{order_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"].as_i64().unwrap(), order_id);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn zero_quantity_is_a_validation_error() {
    let app = setup();
    let (restaurant_id, table_id, menu_item_id) = seed(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/restaurants/{restaurant_id}/orders"),
        Some(json!({
            "table_id": table_id,
            "items": [{ "menu_item_id": menu_item_id, "quantity": 0 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");
}

#[tokio::test]
async fn cancelling_twice_is_an_invalid_state() {
    let app = setup();
    let (restaurant_id, table_id, menu_item_id) = seed(&app).await;

    let (_, body) = send(
        &app,
        "POST",
        &format!("/api/restaurants/{restaurant_id}/orders"),
        Some(json!({
            "table_id": table_id,
            "items": [{ "menu_item_id": menu_item_id, "quantity": 1 }]
        })),
    )
    .await;
    let order_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/restaurants/{restaurant_id}/orders/{order_id}/cancel"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/restaurants/{restaurant_id}/orders/{order_id}/cancel"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E0005");
}

#[tokio::test]
async fn cancelling_the_last_item_reports_the_cascade() {
    let app = setup();
    let (restaurant_id, table_id, menu_item_id) = seed(&app).await;

    let (_, body) = send(
        &app,
        "POST",
        &format!("/api/restaurants/{restaurant_id}/orders"),
        Some(json!({
            "table_id": table_id,
            "items": [{ "menu_item_id": menu_item_id, "quantity": 1 }]
        })),
    )
    .await;
    let order_id = body["data"]["id"].as_i64().unwrap();
    let item_id = body["data"]["items"][0]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/restaurants/{restaurant_id}/orders/{order_id}/items/{item_id}/cancel"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order_cancelled"], true);
    assert_eq!(body["data"]["order"]["status"], "CANCELLED");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("no items remain")
    );
}

#[tokio::test]
async fn table_flow_accumulates_then_rolls_over_after_payment() {
    let app = setup();
    let (restaurant_id, table_id, menu_item_id) = seed(&app).await;
    let base = format!("/api/restaurants/{restaurant_id}/tables/{table_id}/orders");

    // No orders yet
    let (status, _) = send(&app, "GET", &format!("{base}/latest"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let submit = |qty: i64| {
        json!({
            "table_id": table_id,
            "items": [{ "menu_item_id": menu_item_id, "quantity": qty }]
        })
    };

    let (_, body) = send(&app, "POST", &format!("{base}/current"), Some(submit(1))).await;
    let first_id = body["data"]["id"].as_i64().unwrap();

    // Second submission lands on the same open tab
    let (_, body) = send(&app, "POST", &format!("{base}/current"), Some(submit(4))).await;
    assert_eq!(body["data"]["id"].as_i64().unwrap(), first_id);
    assert_eq!(body["data"]["total_cost"], 26.0);
    assert_eq!(body["message"], "Order updated successfully");

    // The table view embeds the menu item
    let (_, body) = send(&app, "GET", &format!("{base}/latest"), None).await;
    assert_eq!(body["data"]["items"][0]["menu_item"]["name"], "Croquetas");

    // Pay, then the next submission opens a fresh order
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("{base}/paid"),
        Some(json!({ "paid": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["paid"], true);

    let (_, body) = send(&app, "POST", &format!("{base}/current"), Some(submit(2))).await;
    assert_ne!(body["data"]["id"].as_i64().unwrap(), first_id);
    assert_eq!(body["message"], "Order created successfully");
}

#[tokio::test]
async fn cross_restaurant_menu_item_is_rejected() {
    let app = setup();
    let (restaurant_id, table_id, _) = seed(&app).await;

    // A second restaurant with its own menu
    let (_, body) = send(
        &app,
        "POST",
        "/api/restaurants",
        Some(json!({ "name": "El Faro" })),
    )
    .await;
    let other_id = body["data"]["id"].as_i64().unwrap();
    let (_, body) = send(
        &app,
        "POST",
        &format!("/api/restaurants/{other_id}/categories"),
        Some(json!({ "name": "Postres" })),
    )
    .await;
    let other_category = body["data"]["id"].as_i64().unwrap();
    let (_, body) = send(
        &app,
        "POST",
        &format!("/api/restaurants/{other_id}/menu-items"),
        Some(json!({ "category_id": other_category, "name": "Flan", "price": 4.0 })),
    )
    .await;
    let foreign_item = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/restaurants/{restaurant_id}/orders"),
        Some(json!({
            "table_id": table_id,
            "items": [{ "menu_item_id": foreign_item, "quantity": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");
}

#[tokio::test]
async fn order_lists_are_scoped_by_restaurant() {
    let app = setup();
    let (restaurant_id, table_id, menu_item_id) = seed(&app).await;

    send(
        &app,
        "POST",
        &format!("/api/restaurants/{restaurant_id}/orders"),
        Some(json!({
            "table_id": table_id,
            "items": [{ "menu_item_id": menu_item_id, "quantity": 1 }]
        })),
    )
    .await;

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/restaurants/{restaurant_id}/orders"),
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, "POST", "/api/restaurants", Some(json!({ "name": "Otro" }))).await;
    let other_id = body["data"]["id"].as_i64().unwrap();
    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/restaurants/{other_id}/orders"),
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}
