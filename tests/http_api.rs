//! Router tests driven through `tower::ServiceExt::oneshot`; no socket is bound.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use shop_request_log::config::{AppConfig, ReadPolicy};
use shop_request_log::HttpServer;

mod common;

fn app(config: &AppConfig) -> Router {
    HttpServer::new(config.clone()).router()
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = to_bytes(resp.into_body(), 4 * 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    serde_json::from_str(&body_text(resp).await).unwrap()
}

// ── Append ───────────────────────────────────────────────────

#[tokio::test]
async fn append_returns_integration_stamp() {
    let (config, _dir) = common::test_config();
    let resp = app(&config)
        .oneshot(post("/shop/shop1", r#"{"x":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let json = body_json(resp).await;
    assert_eq!(json["name"], "Тестовая интеграция");
    assert_eq!(json["version"], "12312");
    assert!(json["time"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn append_writes_one_line_per_request() {
    let (config, dir) = common::test_config();
    let app = app(&config);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/shop/shop1?ignored=1")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-tag", "one")
        .header("x-tag", "two")
        .body(Body::from(r#"{"x":1}"#))
        .unwrap();
    app.clone().oneshot(request).await.unwrap();
    app.oneshot(post("/shop/shop1", "second")).await.unwrap();

    let content = std::fs::read_to_string(dir.path().join("shop1.log")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["method"], "POST");
    assert_eq!(first["path"], "/shop/shop1");
    assert_eq!(first["body"], r#"{"x":1}"#);
    assert_eq!(first["headers"]["Content-Type"][0], "application/json");
    assert_eq!(first["headers"]["X-Tag"], serde_json::json!(["one", "two"]));
    let time = first["time"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(time).is_ok());
}

#[tokio::test]
async fn append_stores_headers_as_received() {
    let (config, dir) = common::test_config();
    let resp = app(&config)
        .oneshot(post("/shop/shop1", r#"{"x":1}"#))
        .await
        .unwrap();
    assert!(resp.headers().contains_key("x-request-id"));

    let content = std::fs::read_to_string(dir.path().join("shop1.log")).unwrap();
    let first: Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert_eq!(
        first["headers"],
        serde_json::json!({ "Content-Type": ["application/json"] })
    );
}

#[tokio::test]
async fn append_keeps_client_request_id() {
    let (config, dir) = common::test_config();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/shop/shop1")
        .header("x-request-id", "client-42")
        .body(Body::from("{}"))
        .unwrap();
    let resp = app(&config).oneshot(request).await.unwrap();
    assert_eq!(resp.headers()["x-request-id"], "client-42");

    let content = std::fs::read_to_string(dir.path().join("shop1.log")).unwrap();
    let first: Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert_eq!(
        first["headers"],
        serde_json::json!({ "X-Request-Id": ["client-42"] })
    );
}

#[tokio::test]
async fn append_without_shop_is_bad_request() {
    let (config, dir) = common::test_config();
    let resp = app(&config).oneshot(post("/shop/", "{}")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await["error"],
        "не указан идентификатор магазина"
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn append_rejects_path_traversal() {
    let (config, _dir) = common::test_config();
    let resp = app(&config)
        .oneshot(post("/shop/..%2Fescape", "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn append_over_body_limit_is_bad_request() {
    let (mut config, dir) = common::test_config();
    config.limits.max_body_size = 16;
    let resp = app(&config)
        .oneshot(post("/shop/shop1", &"x".repeat(64)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await["error"],
        "не удалось прочитать тело запроса"
    );
    assert!(!dir.path().join("shop1.log").exists());
}

#[tokio::test]
async fn append_into_missing_directory_is_server_error() {
    let (mut config, dir) = common::test_config();
    config.storage.log_dir = dir.path().join("missing");
    let resp = app(&config).oneshot(post("/shop/shop1", "{}")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await["error"], "не удалось открыть файл");
}

// ── Read ─────────────────────────────────────────────────────

#[tokio::test]
async fn html_view_lists_records() {
    let (config, _dir) = common::test_config();
    let app = app(&config);
    app.clone()
        .oneshot(post("/shop/shop1", "<b>hello</b>"))
        .await
        .unwrap();

    let resp = app.oneshot(get("/shop/shop1/logs")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    let html = body_text(resp).await;
    assert!(html.contains("<h1>Логи магазина shop1</h1>"));
    assert!(html.contains("<td>POST</td><td>/shop/shop1</td>"));
    assert!(html.contains("&lt;b&gt;hello&lt;/b&gt;"));
}

#[tokio::test]
async fn html_view_of_unknown_shop_is_not_found() {
    let (config, _dir) = common::test_config();
    let resp = app(&config).oneshot(get("/shop/ghost/logs")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "Лог не найден");
}

#[tokio::test]
async fn html_view_of_corrupt_log_is_server_error() {
    let (config, dir) = common::test_config();
    std::fs::write(dir.path().join("shop1.log"), "{\"method\":\"GET\"}\nnot json\n").unwrap();

    let resp = app(&config).oneshot(get("/shop/shop1/logs")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(resp).await, "Не удалось распарсить лог");
}

#[tokio::test]
async fn skip_policy_renders_remaining_records() {
    let (mut config, dir) = common::test_config();
    config.storage.read_policy = ReadPolicy::Skip;
    std::fs::write(
        dir.path().join("shop1.log"),
        "{\"method\":\"GET\",\"path\":\"/ok\"}\nnot json\n",
    )
    .unwrap();

    let resp = app(&config).oneshot(get("/shop/shop1/logs")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("<td>GET</td><td>/ok</td>"));
}

#[tokio::test]
async fn json_view_returns_records_in_order() {
    let (config, _dir) = common::test_config();
    let app = app(&config);
    for body in ["one", "two", "three"] {
        app.clone().oneshot(post("/shop/shop1", body)).await.unwrap();
    }

    let resp = app.oneshot(get("/shop/shop1/logs.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let bodies: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn json_view_of_unknown_shop_is_not_found() {
    let (config, _dir) = common::test_config();
    let resp = app(&config)
        .oneshot(get("/shop/ghost/logs.json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"], "Лог не найден");
}

#[tokio::test]
async fn shops_lists_tenants_with_logs() {
    let (config, _dir) = common::test_config();
    let app = app(&config);
    app.clone().oneshot(post("/shop/beta", "{}")).await.unwrap();
    app.clone().oneshot(post("/shop/alpha", "{}")).await.unwrap();

    let resp = app.oneshot(get("/shops")).await.unwrap();
    assert_eq!(
        body_json(resp).await,
        serde_json::json!({ "shops": ["alpha", "beta"] })
    );
}

// ── Delete ───────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_log_then_reports_absence() {
    let (config, dir) = common::test_config();
    let app = app(&config);
    app.clone().oneshot(post("/shop/shop1", "{}")).await.unwrap();

    let resp = app.clone().oneshot(delete("/shop/shop1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "лог удалён");
    assert!(!dir.path().join("shop1.log").exists());

    let resp = app.clone().oneshot(delete("/shop/shop1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"], "лог уже отсутствует");

    let resp = app.oneshot(get("/shop/shop1/logs")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_without_shop_is_bad_request() {
    let (config, _dir) = common::test_config();
    let resp = app(&config).oneshot(delete("/shop/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Diagnostics ──────────────────────────────────────────────

#[tokio::test]
async fn external_error_always_fails() {
    let (config, dir) = common::test_config();
    let resp = app(&config)
        .oneshot(post("/shop/shop1/externalError", "{}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(resp).await,
        serde_json::json!({ "status": "500", "message": "Внутренняя ошибка сервера" })
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn health_reports_ok() {
    let (config, _dir) = common::test_config();
    let resp = app(&config).oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "ok");
}
