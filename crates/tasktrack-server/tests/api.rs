//! HTTP-level tests against the router backed by the in-memory store.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::NaiveDate;
use serde_json::{Value, json};
use std::sync::Arc;
use tasktrack_core::{MemoryStore, TrackerConfig, TrackerService};
use tasktrack_server::{AppState, create_router};
use tower::ServiceExt;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2031, 8, 20).unwrap()
}

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
}

fn app_with(config: TrackerConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let service = TrackerService::from_store(store.clone()).with_clock(today);
    TestApp {
        router: create_router(AppState::new(service, config)),
        store,
    }
}

fn app() -> TestApp {
    app_with(TrackerConfig::default())
}

struct Reply {
    status: StatusCode,
    headers: axum::http::HeaderMap,
    text: String,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or(Value::Null)
    }
}

async fn send(app: &TestApp, req: Request<Body>) -> Reply {
    let resp = app.router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    Reply {
        status,
        headers,
        text: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn token_request(uri: &str, username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!(
            "grant_type=password&username={username}&password={password}"
        )))
        .unwrap()
}

fn get_tasks(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn register_and_login(app: &TestApp, login: &str) -> String {
    let reply = send(
        app,
        json_request("POST", "/reg", None, json!({"login": login, "password": "password123"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text);

    let reply = send(app, token_request("/token", login, "password123")).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text);
    reply.json()["access_token"].as_str().unwrap().to_string()
}

async fn add_task(app: &TestApp, token: &str, body: Value) -> Reply {
    send(app, json_request("POST", "/add_task", Some(token), body)).await
}

#[tokio::test]
async fn healthz_is_public() {
    let app = app();
    let reply = send(&app, get_tasks("/healthz", None)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["ok"], true);
}

#[tokio::test]
async fn register_then_duplicate_is_422() {
    let app = app();
    let reply = send(
        &app,
        json_request("POST", "/reg", None, json!({"login": "kim", "password": "password123"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({"status": "kim registered"}));

    let reply = send(
        &app,
        json_request("POST", "/reg", None, json!({"login": "kim", "password": "different-pass"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.json()["detail"], "User already exists");
}

#[tokio::test]
async fn short_password_is_422() {
    let app = app();
    let reply = send(
        &app,
        json_request("POST", "/reg", None, json!({"login": "kim", "password": "1234567"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_registration_body_is_422() {
    let app = app();
    let reply = send(&app, json_request("POST", "/reg", None, json!({"login": "kim"}))).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(reply.json()["detail"].is_string());
}

#[tokio::test]
async fn token_shape_and_errors() {
    let app = app();
    register_and_login(&app, "first").await;
    let token = register_and_login(&app, "second").await;
    assert_eq!(token, "2");

    let reply = send(&app, token_request("/token", "second", "password123")).await;
    assert_eq!(
        reply.json(),
        json!({
            "username": "second",
            "status": "logged",
            "access_token": "2",
            "token_type": "bearer"
        })
    );

    let reply = send(&app, token_request("/token", "ghost", "password123")).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(&app, token_request("/token", "second", "password999")).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.json()["detail"], "Incorrect password");
}

#[tokio::test]
async fn token_route_follows_config() {
    let mut config = TrackerConfig::default();
    config.auth.token_url = "auth/login".to_string();
    let app = app_with(config);

    send(
        &app,
        json_request("POST", "/reg", None, json!({"login": "kim", "password": "password123"})),
    )
    .await;
    let reply = send(&app, token_request("/auth/login", "kim", "password123")).await;
    assert_eq!(reply.status, StatusCode::OK);
    let reply = send(&app, token_request("/token", "kim", "password123")).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_routes_require_bearer() {
    let app = app();
    let reply = send(&app, get_tasks("/tasks", None)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.headers[header::WWW_AUTHENTICATE], "Bearer");

    let reply = send(&app, get_tasks("/tasks", Some("not-a-number"))).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(&app, json_request("POST", "/add_task", None, json!({"text": "x"}))).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn add_task_defaults_and_validation() {
    let app = app();
    let token = register_and_login(&app, "kim").await;

    let reply = add_task(&app, &token, json!({"text": "call mom"})).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({"message": "Task added! Task id: 1"}));
    let task = app.store.task(1).unwrap();
    assert_eq!(task.date, NaiveDate::from_ymd_opt(2031, 8, 21).unwrap());
    assert_eq!(task.tag, "");

    for date in ["2031-08-20", "2031-08-01"] {
        let reply = add_task(&app, &token, json!({"text": "late", "date": date})).await;
        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY, "{date}");
    }

    let reply = add_task(&app, &token, json!({"text": "x".repeat(257)})).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);

    let reply = add_task(&app, &token, json!({"text": "bad date", "date": "next week"})).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn tasks_are_grouped_by_tag_in_first_occurrence_order() {
    let app = app();
    let token = register_and_login(&app, "kim").await;

    add_task(&app, &token, json!({"text": "t3", "date": "2031-09-03", "tag": ""})).await;
    add_task(&app, &token, json!({"text": "t1", "date": "2031-09-01", "tag": "work"})).await;
    add_task(&app, &token, json!({"text": "t4", "date": "2031-09-04", "tag": "personal"})).await;
    add_task(&app, &token, json!({"text": "t2", "date": "2031-09-02", "tag": "work"})).await;

    let reply = send(&app, get_tasks("/tasks", Some(&token))).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.text,
        concat!(
            r#"{"work":[{"id":2,"text":"t1","until":"2031-09-01"},{"id":4,"text":"t2","until":"2031-09-02"}],"#,
            r#""without tag":[{"id":1,"text":"t3","until":"2031-09-03"}],"#,
            r#""personal":[{"id":3,"text":"t4","until":"2031-09-04"}]}"#
        )
    );

    let reply = send(&app, get_tasks("/tasks?tag=work", Some(&token))).await;
    let body = reply.json();
    assert_eq!(body.as_object().unwrap().len(), 1);
    assert_eq!(body["work"].as_array().unwrap().len(), 2);

    let reply = send(&app, get_tasks("/tasks?tag=", Some(&token))).await;
    assert_eq!(reply.json().as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn mark_done_rules() {
    let app = app();
    let kim = register_and_login(&app, "kim").await;
    let lee = register_and_login(&app, "lee").await;
    add_task(&app, &kim, json!({"text": "water plants"})).await;

    let reply = send(&app, json_request("PUT", "/mark_done", Some(&lee), json!({"id": 1}))).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!app.store.task(1).unwrap().is_done);

    let reply = send(&app, json_request("PUT", "/mark_done", Some(&kim), json!({"id": 42}))).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    for _ in 0..2 {
        let reply =
            send(&app, json_request("PUT", "/mark_done", Some(&kim), json!({"id": 1}))).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.json(),
            json!({"message": "Task [water plants] marked as done"})
        );
    }
    assert!(app.store.task(1).unwrap().is_done);

    let reply = send(&app, get_tasks("/tasks", Some(&kim))).await;
    assert_eq!(reply.json(), json!({}));
}

#[tokio::test]
async fn token_for_unknown_user_cannot_add_tasks() {
    let app = app();
    let reply = add_task(&app, "77", json!({"text": "orphan"})).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(&app, get_tasks("/tasks", Some("77"))).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!({}));
}

#[tokio::test]
async fn overlong_tag_and_nul_characters_are_422() {
    let app = app();
    let token = register_and_login(&app, "kim").await;

    let reply = add_task(&app, &token, json!({"text": "t", "tag": "x".repeat(257)})).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);

    let reply = add_task(&app, &token, json!({"text": "a\u{0}b"})).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);

    let reply = add_task(&app, &token, json!({"text": "t", "tag": "w\u{0}"})).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);

    let reply = add_task(&app, &token, json!({"text": "t", "tag": "x".repeat(256)})).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(app.store.task(2).is_none());
    assert_eq!(app.store.task(1).unwrap().tag.len(), 256);
}
