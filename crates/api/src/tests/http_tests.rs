// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ApiError, BackofficeApi, BulkImportController, BulkImportParams, ClientConfig, HttpClient,
    OperationStatus,
};
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use backoffice_audit::{AuditAction, AuditLogQuery};
use backoffice_domain::EntityType;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use time::macros::datetime;

#[derive(Clone, Default)]
struct Seen {
    queries: Arc<Mutex<Vec<String>>>,
    auth: Arc<Mutex<Vec<String>>>,
}

/// Serves `router` on an ephemeral local port and returns its API root.
async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn client(base_url: &str) -> HttpClient {
    HttpClient::new(ClientConfig::new(base_url).with_token(Some(String::from("secret-token"))))
        .unwrap()
}

async fn audit_logs(
    State(seen): State<Seen>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    seen.queries.lock().unwrap().push(query.unwrap_or_default());
    if let Some(auth) = headers.get("authorization") {
        seen.auth
            .lock()
            .unwrap()
            .push(auth.to_str().unwrap().to_string());
    }
    Json(json!([
        {
            "id": 901,
            "created_at": "2024-01-10 09:00:12",
            "branch_id": 1,
            "user_id": 42,
            "user_name": "Ayse",
            "entity_type": "stock_entry",
            "entity_id": 17,
            "action": "create",
            "description": "Stok sayımı",
            "is_undone": true,
            "undone_by": 3,
            "undone_at": "2024-01-11 10:00:00",
            "before_data": null,
            "after_data": "{\"quantity\": 4}"
        }
    ]))
}

async fn undo(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
    if id == 13 {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Bu işlem zaten geri alınmış" })),
        )
    } else {
        (StatusCode::OK, Json(json!({ "message": "ok" })))
    }
}

async fn stock_entries(RawQuery(query): RawQuery) -> Json<Value> {
    assert_eq!(query.as_deref(), Some("branch_id=1"));
    Json(json!([
        {
            "id": 17,
            "branch_id": 1,
            "product_id": 5,
            "quantity": 4,
            "date": "2024-01-10",
            "created_at": "2024-01-10T09:00:12Z"
        }
    ]))
}

async fn slow_bulk_import(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["prefix"], "TM");
    tokio::time::sleep(Duration::from_millis(300)).await;
    Json(json!({ "imported": 3, "skipped": 1, "errors": null }))
}

async fn endless_bulk_import() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(60)).await;
    Json(json!({ "imported": 0, "skipped": 0, "errors": [] }))
}

async fn slow_list() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!([]))
}

fn router(seen: Seen) -> Router {
    Router::new()
        .route("/api/audit-logs", get(audit_logs))
        .route("/api/audit-logs/{id}/undo", post(undo))
        .route("/api/stock-entries", get(stock_entries))
        .route("/api/expenses", get(slow_list))
        .route("/api/admin/products/bulk-import-b2b", post(slow_bulk_import))
        .with_state(seen)
}

#[tokio::test]
async fn test_list_audit_logs_sends_filters_and_token() {
    let seen = Seen::default();
    let base_url = spawn_server(router(seen.clone())).await;

    let query = AuditLogQuery::for_entity_type(EntityType::StockEntry).in_branch(Some(1));
    let logs = client(&base_url).list_audit_logs(&query).await.unwrap();

    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, AuditAction::Create);
    assert_eq!(logs[0].created_at, datetime!(2024-01-10 09:00:12 UTC));
    assert!(logs[0].is_undone);
    assert_eq!(
        seen.queries.lock().unwrap().clone(),
        vec![String::from("entity_type=stock_entry&branch_id=1")]
    );
    assert_eq!(
        seen.auth.lock().unwrap().clone(),
        vec![String::from("Bearer secret-token")]
    );
}

#[tokio::test]
async fn test_unscoped_audit_query_sends_no_parameters() {
    let seen = Seen::default();
    let base_url = spawn_server(router(seen.clone())).await;

    client(&base_url)
        .list_audit_logs(&AuditLogQuery::default())
        .await
        .unwrap();

    assert_eq!(seen.queries.lock().unwrap().clone(), vec![String::new()]);
}

#[tokio::test]
async fn test_undo_success_and_server_rejection() {
    let base_url = spawn_server(router(Seen::default())).await;
    let client = client(&base_url);

    client.undo_audit_log(12).await.unwrap();

    let err = client.undo_audit_log(13).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Server {
            status: 400,
            message: String::from("Bu işlem zaten geri alınmış"),
        }
    );
}

#[tokio::test]
async fn test_list_records_reads_collection() {
    let base_url = spawn_server(router(Seen::default())).await;

    let records = client(&base_url)
        .list_records(&EntityType::StockEntry, Some(1))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id(), 17);
    assert_eq!(records[0].field("quantity"), Some(&json!(4)));
    assert_eq!(
        records[0].created_at(),
        Some(datetime!(2024-01-10 09:00:12 UTC))
    );
}

#[tokio::test]
async fn test_unknown_collection_is_rejected_before_request() {
    let base_url = spawn_server(router(Seen::default())).await;

    let err = client(&base_url)
        .list_records(&EntityType::from("trade"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_missing_route_maps_to_server_error() {
    let base_url = spawn_server(router(Seen::default())).await;

    let err = client(&base_url)
        .list_records(&EntityType::CashMovement, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Server { status: 404, .. }));
}

#[tokio::test]
async fn test_ordinary_requests_time_out() {
    let base_url = spawn_server(router(Seen::default())).await;
    let client = HttpClient::new(
        ClientConfig::new(&base_url).with_request_timeout(Duration::from_millis(100)),
    )
    .unwrap();

    let err = client
        .list_records(&EntityType::Expense, None)
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[tokio::test]
async fn test_bulk_import_ignores_request_timeout() {
    let base_url = spawn_server(router(Seen::default())).await;
    let client = HttpClient::new(
        ClientConfig::new(&base_url).with_request_timeout(Duration::from_millis(100)),
    )
    .unwrap();

    let response = client
        .bulk_import_b2b(&BulkImportParams::new("TM", 0, 3))
        .await
        .unwrap();

    assert_eq!(response.imported, 3);
    assert_eq!(response.skipped, 1);
    assert_eq!(response.errors, None);
    assert!(!response.cancelled);
}

#[tokio::test]
async fn test_bulk_import_cancel_drops_request() {
    let base_url = spawn_server(
        Router::new().route("/api/admin/products/bulk-import-b2b", post(endless_bulk_import)),
    )
    .await;
    let controller = BulkImportController::new(Arc::new(client(&base_url)));

    let run = controller.start(BulkImportParams::new("CD", 0, 9999)).unwrap();
    let handle = run.cancel_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
    });

    let finished = tokio::time::timeout(Duration::from_secs(5), run.wait())
        .await
        .unwrap();

    assert_eq!(finished.status, OperationStatus::Cancelled);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}/api"))
        .undo_audit_log(1)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Network { .. }), "got {err:?}");
}
