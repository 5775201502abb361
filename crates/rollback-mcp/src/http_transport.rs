//! HTTP transport for the MCP server.
//!
//! Provides an HTTP/SSE transport so remote agents and API integrations can
//! connect without a stdio pipe. Requests arrive as JSON-RPC POSTs; the SSE
//! endpoint announces where to POST and then holds the connection open with
//! keep-alive pings.

use crate::error::McpError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Sse},
    routing::{get, post},
    Json, Router,
};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;

/// HTTP transport handler state.
pub struct HttpTransportState {
    /// Channel for sending requests to the MCP server.
    request_tx: mpsc::Sender<(JsonRpcRequest, mpsc::Sender<JsonRpcResponse>)>,
}

impl HttpTransportState {
    /// Create a new HTTP transport state.
    pub fn new(request_tx: mpsc::Sender<(JsonRpcRequest, mpsc::Sender<JsonRpcResponse>)>) -> Self {
        Self { request_tx }
    }
}

/// Create the HTTP router for MCP.
pub fn create_router(state: Arc<HttpTransportState>) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp_post))
        .route("/mcp", get(handle_mcp_sse))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Handle POST requests to /mcp (JSON-RPC over HTTP).
async fn handle_mcp_post(
    State(state): State<Arc<HttpTransportState>>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    let (response_tx, mut response_rx) = mpsc::channel(1);

    if state.request_tx.send((request, response_tx)).await.is_err() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JsonRpcResponse::error(None, -32603, "MCP server unavailable")),
        );
    }

    match response_rx.recv().await {
        Some(response) => (StatusCode::OK, Json(response)),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JsonRpcResponse::error(None, -32603, "No response from MCP server")),
        ),
    }
}

/// Handle GET requests to /mcp (SSE).
///
/// Emits a single `endpoint` event pointing at the POST route, then lets
/// keep-alive pings hold the connection open until the client disconnects.
async fn handle_mcp_sse() -> impl IntoResponse {
    let stream = async_stream::stream! {
        yield Ok::<_, Infallible>(
            axum::response::sse::Event::default()
                .event("endpoint")
                .data("/mcp"),
        );
        std::future::pending::<()>().await;
    };

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(std::time::Duration::from_secs(30))
            .text("ping"),
    )
}

/// Handle health check requests.
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "rollback-mcp",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// HTTP server for MCP transport.
pub struct HttpServer {
    addr: String,
    state: Arc<HttpTransportState>,
}

impl HttpServer {
    /// Create a new HTTP server bound to `addr` (`host:port`).
    pub fn new(
        addr: String,
        request_tx: mpsc::Sender<(JsonRpcRequest, mpsc::Sender<JsonRpcResponse>)>,
    ) -> Self {
        Self {
            addr,
            state: Arc::new(HttpTransportState::new(request_tx)),
        }
    }

    /// Run the HTTP server.
    pub async fn run(self) -> Result<(), McpError> {
        let app = create_router(self.state);

        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| McpError::StartupFailed(format!("Failed to bind to {}: {}", self.addr, e)))?;

        tracing::info!(addr = %self.addr, "MCP HTTP server listening");

        axum::serve(listener, app)
            .await
            .map_err(|e| McpError::Internal(e.into()))?;

        Ok(())
    }
}
