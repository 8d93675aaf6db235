//! Integration tests for the HTTP transport.
//!
//! Requests go straight into the router with `tower::ServiceExt::oneshot`;
//! no socket is bound.

use std::sync::Arc;

use apprendo_mcp::catalogue::Catalogue;
use apprendo_mcp::http::{build_router, AppState, SERVICE_NAME};
use apprendo_mcp::mcp::McpHandler;
use apprendo_mcp::tools::BookTools;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use futures::StreamExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn state() -> AppState {
    let catalogue = Arc::new(Catalogue::from_json(include_str!("fixtures/books.json")).unwrap());
    let tools = Arc::new(BookTools::new(Arc::clone(&catalogue)));
    AppState::new(Arc::new(McpHandler::new(tools)), catalogue)
}

fn post_mcp(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/mcp")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn call(body: Value) -> (StatusCode, Value) {
    let response = build_router(state())
        .oneshot(post_mcp(body.to_string()))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_catalogue_size() {
    let response = build_router(state())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["name"], SERVICE_NAME);
    assert_eq!(body["status"], "running");
    assert_eq!(body["books"], 3);
    assert_eq!(body["endpoints"]["mcp"], "/mcp");
    assert_eq!(body["endpoints"]["sse"], "/sse");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let response = build_router(state())
        .oneshot(Request::builder().uri("/books").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// POST /mcp
// =============================================================================

#[tokio::test]
async fn mcp_lists_tools() {
    let (status, body) = call(json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn mcp_calls_tool_without_initialisation() {
    let (status, body) = call(json!({
        "jsonrpc": "2.0",
        "id": "abc",
        "method": "tools/call",
        "params": {
            "name": "get_book_summary",
            "arguments": { "book_id": "deep-work" }
        }
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "abc");
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    let summary: Value = serde_json::from_str(text).unwrap();
    assert_eq!(summary["author"], "Cal Newport");
}

#[tokio::test]
async fn mcp_tool_failure_is_json_rpc_error() {
    let (status, body) = call(json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/call",
        "params": { "name": "get_book_details", "arguments": { "book_id": "missing" } }
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 2);
    assert_eq!(body["error"]["code"], -32602);
    assert_eq!(body["error"]["message"], "Book with ID missing not found");
}

#[tokio::test]
async fn mcp_initialize_negotiates_version() {
    let (_, body) = call(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": { "protocolVersion": "2024-11-05", "capabilities": {} }
    }))
    .await;
    assert_eq!(body["result"]["protocolVersion"], "2024-11-05");
    assert!(body["result"]["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn mcp_notification_is_accepted() {
    let response = build_router(state())
        .oneshot(post_mcp(
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn mcp_invalid_json_is_internal_error() {
    let response = build_router(state())
        .oneshot(post_mcp("{ not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Internal server error" })
    );
}

#[tokio::test]
async fn mcp_malformed_envelope_is_invalid_request() {
    let (status, body) = call(json!({ "jsonrpc": "1.0", "id": 4, "method": "ping" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32600);
}

#[tokio::test]
async fn mcp_requires_post() {
    let response = build_router(state())
        .oneshot(Request::builder().uri("/mcp").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// GET /sse
// =============================================================================

async fn next_chunk<S>(stream: &mut S) -> String
where
    S: futures::Stream<Item = Result<axum::body::Bytes, axum::Error>> + Unpin,
{
    let chunk = stream.next().await.unwrap().unwrap();
    String::from_utf8(chunk.to_vec()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn sse_sends_connected_then_pings() {
    let state = state();
    let response = build_router(state.clone())
        .oneshot(Request::builder().uri("/sse").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
    assert_eq!(state.streams.active(), 1);

    let mut stream = response.into_body().into_data_stream();

    let connected = next_chunk(&mut stream).await;
    assert!(connected.contains("event: connected"), "{connected}");
    assert!(connected.contains("\"status\":\"connected\""), "{connected}");

    let started = tokio::time::Instant::now();
    let ping = next_chunk(&mut stream).await;
    assert!(ping.contains("event: ping"), "{ping}");
    assert!(ping.contains("timestamp"), "{ping}");
    assert!(started.elapsed() >= state.keep_alive);

    drop(stream);
    assert_eq!(state.streams.active(), 0);
}

#[tokio::test(start_paused = true)]
async fn sse_streams_end_on_shutdown() {
    let state = state();
    let response = build_router(state.clone())
        .oneshot(Request::builder().uri("/sse").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let mut stream = response.into_body().into_data_stream();
    next_chunk(&mut stream).await;

    state.shutdown.cancel();
    assert!(stream.next().await.is_none());

    drop(stream);
    assert_eq!(state.streams.active(), 0);
}
