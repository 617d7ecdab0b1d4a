// REST router tests
//
// Requests are driven through the axum router with `tower::ServiceExt`; no
// socket is bound.

#[path = "../support/mod.rs"]
mod support;

use askdb_core::server::build_router;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use std::sync::Arc;
use support::{ScriptedProvider, ShopDatabase, agent_settings, build_service};
use tower::ServiceExt;

fn router(provider: ScriptedProvider) -> Router {
    let service = build_service(
        provider,
        Arc::new(ShopDatabase::with_customers(7)),
        agent_settings(),
    );
    build_router(Arc::new(service))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request builds");

    let response = app.oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn ask_returns_answer_payload() {
    let app = router(ScriptedProvider::new(vec![
        r#"{"action":"call_tool","tool":"run_query","input":{"sql":"SELECT COUNT(*) FROM customers"}}"#,
        r#"{"action":"final","response":"There are 7 customers."}"#,
    ]));

    let (status, body) = send(
        app,
        Method::POST,
        "/ask",
        Some(json!({"question": "How many customers?", "session_id": "web-1"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "answered");
    assert_eq!(body["answer"], "There are 7 customers.");
    assert_eq!(body["session_id"], "web-1");
    assert_eq!(body["steps"][0]["tool"], "run_query");
}

#[tokio::test]
async fn missing_question_field_still_gets_an_answer_payload() {
    let provider = ScriptedProvider::new(vec![]);
    let app = router(provider.clone());

    let (status, body) = send(app, Method::POST, "/ask", Some(json!({"questoin": "hi"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "clarification");
    assert!(body["answer"].as_str().is_some_and(|text| text.contains("question")));
    assert!(body["session_id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(body["steps"], json!([]));
    assert!(provider.requests().await.is_empty());
}

#[tokio::test]
async fn malformed_json_body_gets_an_answer_payload() {
    let app = router(ScriptedProvider::new(vec![]));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"question\": "))
        .expect("request builds");

    let response = app.oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let body: Value = serde_json::from_slice(&bytes).expect("json payload");

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "clarification");
}

#[tokio::test]
async fn empty_question_is_a_bad_request_with_payload() {
    let app = router(ScriptedProvider::new(vec![]));

    let (status, body) = send(app, Method::POST, "/ask", Some(json!({"question": "  "}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "clarification");
    assert!(body["answer"].as_str().is_some_and(|text| !text.is_empty()));
    assert!(body["session_id"].as_str().is_some());
}

#[tokio::test]
async fn model_outage_is_a_bad_gateway() {
    let app = router(ScriptedProvider::new(vec![]));

    let (status, body) = send(
        app,
        Method::POST,
        "/ask",
        Some(json!({"question": "How many customers?"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], "failed");
}

#[tokio::test]
async fn memory_clear_is_ok() {
    let app = router(ScriptedProvider::new(vec![]));

    let (status, body) = send(
        app,
        Method::POST,
        "/ask",
        Some(json!({"question": "/clear", "session_id": "web-2"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "memory_cleared");
}

#[tokio::test]
async fn tools_lists_the_registry() {
    let app = router(ScriptedProvider::new(vec![]));

    let (status, body) = send(app, Method::GET, "/tools", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dialect"], "MySQL");
    assert_eq!(body["max_rows"], 5);
    let names: Vec<&str> = body["tools"]
        .as_array()
        .expect("tools array")
        .iter()
        .filter_map(|tool| tool["name"].as_str())
        .collect();
    assert_eq!(names, ["list_tables", "get_schema", "validate_query", "run_query"]);
}

#[tokio::test]
async fn health_reports_database_state() {
    let app = router(ScriptedProvider::new(vec![]));

    let (status, body) = send(app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn delete_session_reports_whether_it_existed() {
    let app = router(ScriptedProvider::new(vec![]));

    let (status, body) = send(app, Method::DELETE, "/sessions/unknown", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_id"], "unknown");
    assert_eq!(body["cleared"], false);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = router(ScriptedProvider::new(vec![]));
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/ask")
        .header(header::ORIGIN, "https://dashboard.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .expect("request builds");

    let response = app.oneshot(request).await.expect("router responds");

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = router(ScriptedProvider::new(vec![]));

    let (status, body) = send(app, Method::GET, "/api-doc/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/ask"].is_object());
}
