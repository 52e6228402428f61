use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use db::DBProvider;
use executors::orchestrator::{ItemLauncher, NotificationSink};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use server::{AppState, events::EventBus, routes};
use tower::util::ServiceExt;

struct TestApp {
    router: Router,
    events: EventBus,
    _dir: tempfile::TempDir,
}

async fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("test.sqlite").display());
    let db = DBProvider::connect(&url).await.unwrap();

    let events = EventBus::default();
    let sink: Arc<dyn NotificationSink> = Arc::new(events.clone());
    let launcher = Arc::new(ItemLauncher::new(sink, Arc::new(events.clone())));
    let state = AppState::new(db, events.clone(), launcher);

    TestApp {
        router: routes::router(state),
        events,
        _dir: dir,
    }
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = test_app().await;
    let (status, body) = send(&app.router, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!("OK"));
}

#[tokio::test]
async fn category_and_item_crud_flow() {
    let app = test_app().await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/categories",
        Some(json!({ "name": "recon" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let category_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/items",
        Some(json!({
            "category_id": category_id,
            "name": "who am i",
            "item_type": "command",
            "command": "whoami"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["item_type"], json!("command"));

    let (status, body) = send(
        &app.router,
        "GET",
        &format!("/api/categories/{category_id}/items"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app.router,
        "DELETE",
        &format!("/api/categories/{category_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app.router, "GET", "/api/items", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn missing_item_is_a_404() {
    let app = test_app().await;
    let (status, body) = send(
        &app.router,
        "DELETE",
        "/api/items/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn settings_round_trip_with_defaults() {
    let app = test_app().await;

    let (_, body) = send(&app.router, "GET", "/api/settings", None).await;
    assert_eq!(body["data"]["closeBehavior"], json!("minimize"));
    assert_eq!(body["data"]["autoMinimizeAfterRun"], json!(false));

    let (status, _) = send(
        &app.router,
        "PUT",
        "/api/settings",
        Some(json!({
            "theme": "dark",
            "closeBehavior": "exit",
            "autoMinimizeAfterRun": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app.router, "GET", "/api/settings", None).await;
    assert_eq!(body["data"]["theme"], json!("dark"));
    assert_eq!(body["data"]["autoMinimizeAfterRun"], json!(true));
}

#[tokio::test]
async fn environment_round_trip() {
    let app = test_app().await;

    let (_, body) = send(&app.router, "GET", "/api/environment", None).await;
    assert_eq!(body["data"]["python"], json!(""));

    let (status, _) = send(
        &app.router,
        "PUT",
        "/api/environment",
        Some(json!({
            "python": "C:\\Python311\\python.exe",
            "java": "",
            "javaEnvironments": [
                { "id": "17", "name": "jdk17", "path": "C:\\jdk17\\bin" }
            ],
            "defaultJavaEnvironmentId": "17"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app.router, "GET", "/api/environment", None).await;
    assert_eq!(body["data"]["defaultJavaEnvironmentId"], json!("17"));
}

#[tokio::test]
async fn running_an_item_reports_the_outcome_and_publishes_an_event() {
    let app = test_app().await;
    let mut rx = app.events.subscribe();

    let (_, body) = send(
        &app.router,
        "POST",
        "/api/categories",
        Some(json!({ "name": "tools" })),
    )
    .await;
    let category_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app.router,
        "POST",
        "/api/items",
        Some(json!({
            "category_id": category_id,
            "name": "greeting",
            "item_type": "command",
            "command": "echo hi"
        })),
    )
    .await;
    let item_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app.router,
        "POST",
        &format!("/api/items/{item_id}/run"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], json!("success"));
    assert_eq!(body["data"]["output"].as_str().unwrap().trim(), "hi");

    let event = rx.recv().await.unwrap();
    let event = serde_json::to_value(&event).unwrap();
    assert_eq!(event["type"], json!("notification"));
    assert_eq!(event["title"], json!("Success"));
}

#[tokio::test]
async fn running_an_item_with_shell_operators_fails_cleanly() {
    let app = test_app().await;

    let (_, body) = send(
        &app.router,
        "POST",
        "/api/categories",
        Some(json!({ "name": "tools" })),
    )
    .await;
    let category_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app.router,
        "POST",
        "/api/items",
        Some(json!({
            "category_id": category_id,
            "name": "bad",
            "item_type": "command",
            "command": "echo hi | tee out"
        })),
    )
    .await;
    let item_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app.router,
        "POST",
        &format!("/api/items/{item_id}/run"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], json!("failure"));
}
