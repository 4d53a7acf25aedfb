use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::Request, ServiceExt};
use reqwest::StatusCode;
use serde_json::{json, Value};
use server::{routes, state::AppState};
use service::storage::{DbStorage, Storage};
use tokio::net::TcpListener;

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let cfg = configs::DatabaseConfig::with_url("sqlite::memory:");
    let store: Arc<dyn Storage> = Arc::new(DbStorage::connect(&cfg).await?);
    let app = routes::app(AppState::new(store));

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}/api/v1", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

#[tokio::test]
async fn e2e_status_and_crud() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/status/", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"status": "OK"}));

    let res = client.post(format!("{}/amenities", app.base_url)).json(&json!({"name": "Wifi"})).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let res = client.get(format!("{}/amenities", app.base_url)).send().await?;
    let list: Value = res.json().await?;
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let res = client.delete(format!("{}/amenities/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = client.delete(format!("{}/amenities/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Not found"}));

    let res = client
        .post(format!("{}/amenities", app.base_url))
        .header("content-type", "application/json")
        .body("definitely not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Bad Request"}));
    Ok(())
}
