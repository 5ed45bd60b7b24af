use axum::{Json, Router, http::StatusCode, routing::get};
use serde_json::{Value, json};

use engine::{BudgetSync, HttpGateway, StoreHandle, SyncConfig};

/// Serve `router` on an ephemeral port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn quota_exceeded() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INSUFFICIENT_STORAGE,
        Json(json!({"message": "Quota exceeded"})),
    )
}

async fn database_down() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "database is down"})),
    )
}

async fn bare_failure() -> StatusCode {
    StatusCode::BAD_GATEWAY
}

#[tokio::test]
async fn server_message_becomes_the_save_error() {
    let base_url = serve(Router::new().route("/budget", get(database_down).post(quota_exceeded))).await;
    let sync = BudgetSync::new(
        StoreHandle::default(),
        HttpGateway::new(base_url),
        &SyncConfig::default(),
    );

    assert!(sync.save_now().await.is_err());

    let status = sync.status();
    assert_eq!(status.save_error.as_deref(), Some("Quota exceeded"));
    assert_eq!(status.last_saved, None);
}

#[tokio::test]
async fn server_message_becomes_the_load_error() {
    let base_url = serve(Router::new().route("/budget", get(database_down))).await;
    let sync = BudgetSync::start(
        StoreHandle::default(),
        HttpGateway::new(base_url),
        &SyncConfig::default(),
    )
    .await;

    let status = sync.status();
    assert_eq!(status.load_error.as_deref(), Some("database is down"));
    assert!(!status.data_loaded);
}

#[tokio::test]
async fn failure_without_body_uses_the_fallback() {
    let base_url = serve(Router::new().route("/budget", get(bare_failure).post(bare_failure))).await;
    let sync = BudgetSync::start(
        StoreHandle::default(),
        HttpGateway::new(base_url),
        &SyncConfig::default(),
    )
    .await;
    assert!(sync.save_now().await.is_err());

    let status = sync.status();
    assert_eq!(status.load_error.as_deref(), Some("Failed to load budget data"));
    assert_eq!(status.save_error.as_deref(), Some("Failed to save budget data"));
}
