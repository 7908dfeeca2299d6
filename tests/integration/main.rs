//! End-to-end tests: the service and a fixture site both run on loopback
//! sockets, and the service is driven with a real HTTP client.

use std::net::SocketAddr;

use axum::response::Html;
use axum::routing::get;
use axum::Router;
use page_analyzer::api::{create_router, AppState};
use page_analyzer::checker::PageChecker;
use page_analyzer::config::Config;
use page_analyzer::store::Db;
use serde_json::Value;
use tokio::net::TcpListener;

const FIXTURE_PAGE: &str = r#"<!doctype html>
<html>
  <head>
    <title>Test Page</title>
    <meta name="description" content="Test description">
  </head>
  <body><h1>Test Header</h1><h1>Second header</h1></body>
</html>"#;

async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn spawn_fixture_site() -> SocketAddr {
    spawn(Router::new().route("/", get(|| async { Html(FIXTURE_PAGE) }))).await
}

async fn spawn_service() -> (SocketAddr, Db) {
    let db = Db::open_memory().await.unwrap();
    let checker = PageChecker::new(&Config::default()).unwrap();
    let addr = spawn(create_router(AppState::new(db.clone(), checker))).await;
    (addr, db)
}

async fn json(response: reqwest::Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn submit_check_and_browse_a_site() {
    let site = spawn_fixture_site().await;
    let (service, db) = spawn_service().await;
    let client = reqwest::Client::new();
    let base = format!("http://{service}");

    // Submit with a path and query; only the origin is stored.
    let (status, body) = json(
        client
            .post(format!("{base}/urls"))
            .form(&[("url", format!("http://{site}/some/page?x=1"))])
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["flash"]["kind"], "success");

    let stored = db.urls().find_by_name(&format!("http://{site}")).await.unwrap();
    let url = stored.expect("normalized origin stored");

    // Run two checks.
    for _ in 0..2 {
        let (status, body) = json(
            client
                .post(format!("{base}/urls/{}/checks", url.id))
                .send()
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["flash"]["message"], "Page successfully checked");
    }

    let (status, page) = json(client.get(format!("{base}/urls/{}", url.id)).send().await.unwrap()).await;
    assert_eq!(status, 200);
    assert_eq!(page["url"]["name"], format!("http://{site}"));
    let checks = page["checks"].as_array().unwrap();
    assert_eq!(checks.len(), 2);
    assert_eq!(checks[0]["status_code"], 200);
    assert_eq!(checks[0]["title"], "Test Page");
    assert_eq!(checks[0]["h1"], "Test Header");
    assert_eq!(checks[0]["description"], "Test description");
    assert!(checks[0]["id"].as_i64() > checks[1]["id"].as_i64());

    let (_, list) = json(client.get(format!("{base}/urls")).send().await.unwrap()).await;
    assert_eq!(list["urls"][0]["id"], url.id);
    assert_eq!(list["urls"][0]["last_status_code"], 200);
}

#[tokio::test]
async fn checking_a_site_that_went_away_records_status_zero() {
    let site = spawn_fixture_site().await;
    let (service, db) = spawn_service().await;
    let client = reqwest::Client::new();

    // Point a stored site at a port nobody listens on.
    let gone = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let gone_id = db.urls().save(&format!("http://{gone}")).await.unwrap();
    let live_id = db.urls().save(&format!("http://{site}")).await.unwrap();

    let (status, body) = json(
        client
            .post(format!("http://{service}/urls/{gone_id}/checks"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["flash"]["kind"], "danger");

    let history = db.checks().find_by_url_id(gone_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status_code, 0);
    assert_eq!(
        (history[0].title.as_str(), history[0].h1.as_str(), history[0].description.as_str()),
        ("", "", "")
    );

    // The other site is unaffected.
    assert!(db.checks().find_latest_by_url_id(live_id).await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_site_check_is_not_found() {
    let (service, db) = spawn_service().await;

    let response = reqwest::Client::new()
        .post(format!("http://{service}/urls/77/checks"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    assert!(db.urls().find_all().await.unwrap().is_empty());
}
