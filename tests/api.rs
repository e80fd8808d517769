//! HTTP tests for the ledger API, driven through the router without a socket.

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use variance_ledger::api::{router, AppState};
use variance_ledger::{snapshot, Ledger, LedgerConfig};

fn demo_app() -> Router {
    router(AppState::new(Ledger::from_snapshot(
        snapshot::demo(),
        LedgerConfig::default(),
    )))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn first_category_id(app: &Router) -> String {
    let (_, body) = send(app, Method::GET, "/api/categories", None).await;
    body["data"][0]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = demo_app();
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], "OK");
}

#[tokio::test]
async fn test_list_categories() {
    let app = demo_app();
    let (status, body) = send(&app, Method::GET, "/api/categories", None).await;

    assert_eq!(status, StatusCode::OK);
    let categories = body["data"].as_array().unwrap();
    assert_eq!(categories.len(), 3);
    assert_eq!(categories[0]["label"], "Revenue");
    assert_eq!(categories[0]["item_count"], 7);
    assert_eq!(categories[0]["sort"], "none");
}

#[tokio::test]
async fn test_create_category_and_item() {
    let app = demo_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!({ "label": "Other Income" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/categories/{}/items", id),
        Some(json!({
            "label": "Interest",
            "values": { "31-12-2021": "10", "31-12-2022": "20", "31-12-2024": "25" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["row"]["variance"]["variance"], 5.0);
    assert_eq!(body["data"]["row"]["variance"]["variance_percent"]["value"], 25.0);
    assert_eq!(body["data"]["compact"]["page_index"], 1);

    let (_, body) = send(&app, Method::GET, &format!("/api/categories/{}/totals", id), None).await;
    assert_eq!(body["data"]["label"], "Total Other Income");
    assert_eq!(body["data"]["values"]["31-12-2024"], 25.0);
}

#[tokio::test]
async fn test_invalid_item_is_unprocessable() {
    let app = demo_app();
    let id = first_category_id(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/categories/{}/items", id),
        Some(json!({ "label": "", "values": { "31-12-2021": "1" } })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["details"].as_array().unwrap().len(), 3);
    assert_eq!(body["details"][0]["field"], "label");

    let (_, body) = send(&app, Method::GET, &format!("/api/categories/{}/items", id), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_add_jumps_compact_window() {
    let app = demo_app();
    let id = first_category_id(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/categories/{}/items", id),
        Some(json!({
            "label": "Royalties",
            "values": { "31-12-2021": "1", "31-12-2022": "2", "31-12-2024": "3" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["compact"]["page_index"], 2);

    let (_, body) = send(&app, Method::GET, &format!("/api/categories/{}/window/compact", id), None).await;
    let rows = body["data"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2]["label"], "Royalties");
}

#[tokio::test]
async fn test_update_value_returns_new_totals() {
    let app = demo_app();
    let id = first_category_id(&app).await;
    let (_, body) = send(&app, Method::GET, &format!("/api/categories/{}/items", id), None).await;
    let item = body["data"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/categories/{}/items/{}/values/latest", id, item),
        Some(json!({ "value": "250" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stored"], 250.0);
    assert_eq!(body["data"]["row"]["variance"]["variance"], 100.0);
    // 569 before the edit, +50
    assert_eq!(body["data"]["totals"]["values"]["31-12-2024"], 619.0);
}

#[tokio::test]
async fn test_sort_and_page_commands() {
    let app = demo_app();
    let id = first_category_id(&app).await;

    let (_, body) = send(&app, Method::POST, &format!("/api/categories/{}/sort", id), None).await;
    assert_eq!(body["data"]["sort"], "profit_descending");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/categories/{}/window/compact/page", id),
        Some(json!({ "page": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["page_index"], 2);

    let (_, body) = send(&app, Method::GET, &format!("/api/categories/{}/window/expanded", id), None).await;
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["page_size"], 30);
    assert_eq!(body["data"]["sort"], "profit_descending");
    assert_eq!(body["data"]["rows"][0]["label"], "Subscriptions");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/categories/{}/page-size", id),
        Some(json!({ "page_size": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "page_index": 1, "page_size": 10 }));
}

#[tokio::test]
async fn test_bad_requests() {
    let app = demo_app();
    let id = first_category_id(&app).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/categories/{}/page-size", id),
        Some(json!({ "page_size": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, &format!("/api/categories/{}/window/sideways", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/api/categories/missing/totals", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "category not found: missing");
}

#[tokio::test]
async fn test_snapshot_export() {
    let app = demo_app();
    let (status, body) = send(&app, Method::GET, "/api/snapshot", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["categories"].as_array().unwrap().len(), 3);
}
