//! Axum router for the HTTP transport.
//!
//! Routes:
//! - `GET /` health check with the catalogue size
//! - `POST /mcp` JSON-RPC requests, answered by the shared [`McpHandler`]
//! - `GET /sse` long-lived event stream with keep-alive pings

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use super::sse::{handle_sse, StreamRegistry, KEEP_ALIVE_INTERVAL};
use crate::catalogue::Catalogue;
use crate::mcp::protocol::{parse_value, IncomingMessage};
use crate::mcp::McpHandler;

/// Display name reported by the health endpoint.
pub const SERVICE_NAME: &str = "Apprendo MCP Server";

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The MCP request handler, shared with the stdio transport.
    pub handler: Arc<McpHandler>,
    /// The catalogue, for the health report.
    pub catalogue: Arc<Catalogue>,
    /// Open event streams.
    pub streams: StreamRegistry,
    /// Time between keep-alive pings on `/sse`.
    pub keep_alive: Duration,
    /// Cancelled when the server shuts down, ending every event stream.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Creates state with the default keep-alive interval.
    #[must_use]
    pub fn new(handler: Arc<McpHandler>, catalogue: Arc<Catalogue>) -> Self {
        Self {
            handler,
            catalogue,
            streams: StreamRegistry::default(),
            keep_alive: KEEP_ALIVE_INTERVAL,
            shutdown: CancellationToken::new(),
        }
    }
}

/// Builds the axum `Router` with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_health))
        .route("/mcp", post(handle_mcp))
        .route("/sse", get(handle_sse))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "status": "running",
        "books": state.catalogue.len(),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/",
            "mcp": "/mcp",
            "sse": "/sse",
        },
    }))
}

/// `POST /mcp`
///
/// Requests get a JSON-RPC response (success or error) with status 200.
/// Notifications are acknowledged with 202 and no body. A body that is not
/// JSON at all is treated as a transport failure.
async fn handle_mcp(State(state): State<AppState>, body: Bytes) -> Response {
    let value: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected unparseable MCP request body");
            return internal_error();
        }
    };

    match parse_value(value) {
        Ok(IncomingMessage::Request(req)) => match state.handler.handle_request(&req) {
            Ok(resp) => Json(resp).into_response(),
            Err(error) => Json(error).into_response(),
        },
        Ok(IncomingMessage::Notification(notif)) => {
            tracing::debug!(method = %notif.method, "Notification acknowledged");
            StatusCode::ACCEPTED.into_response()
        }
        Err(error) => Json(error).into_response(),
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::BookTools;

    #[test]
    fn state_uses_default_keep_alive() {
        let catalogue = Arc::new(Catalogue::default());
        let handler = Arc::new(McpHandler::new(Arc::new(BookTools::new(Arc::clone(
            &catalogue,
        )))));
        let state = AppState::new(handler, catalogue);
        assert_eq!(state.keep_alive, KEEP_ALIVE_INTERVAL);
        assert_eq!(state.streams.active(), 0);
        assert!(!state.shutdown.is_cancelled());
    }

    #[test]
    fn internal_error_is_500() {
        assert_eq!(internal_error().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
