//! MCP server implementation.
//!
//! Handles tool discovery and execution over stdio or HTTP. The server is
//! stateless between tool calls; each `tools/call` gets a child cancellation
//! token so a server shutdown aborts in-flight API calls.

use std::io::{BufRead, Write};
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use rollback_client::CircleCiApi;
use rollback_core::{McpConfig, Transport};

use crate::engine::RollbackEngine;
use crate::error::McpError;
use crate::http_transport::HttpServer;
use crate::protocol::{CallToolParams, JsonRpcRequest, JsonRpcResponse};
use crate::tools::{ToolRegistry, ROLLBACK_TOOL};

/// The MCP server.
#[derive(Clone)]
pub struct McpServer {
    config: McpConfig,
    tools: ToolRegistry,
    engine: Arc<RollbackEngine>,
    shutdown: CancellationToken,
}

impl McpServer {
    /// Create a server over the given API implementation.
    pub fn new(config: McpConfig, api: Arc<dyn CircleCiApi>) -> Self {
        Self {
            config,
            tools: ToolRegistry::with_defaults(),
            engine: Arc::new(RollbackEngine::new(api)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token cancelled when the server shuts down; cancel it to abort
    /// in-flight tool calls.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Get a reference to the tool registry.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Start the MCP server on the configured transport.
    pub async fn run(&self) -> Result<(), McpError> {
        match self.config.transport {
            Transport::Stdio => self.run_stdio().await,
            Transport::Http => self.run_http().await,
        }
    }

    /// Run the server with stdio transport.
    async fn run_stdio(&self) -> Result<(), McpError> {
        tracing::info!("Starting MCP server with stdio transport");

        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut stdout_lock = stdout.lock();

        for line in stdin.lock().lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => JsonRpcResponse::error(None, -32700, format!("Parse error: {}", e)),
            };
            let response_json = serde_json::to_string(&response)?;

            writeln!(stdout_lock, "{}", response_json)?;
            stdout_lock.flush()?;

            if self.shutdown.is_cancelled() {
                break;
            }
        }

        Ok(())
    }

    /// Run the server with HTTP transport.
    pub async fn run_http(&self) -> Result<(), McpError> {
        let addr = self.config.bind_addr();
        tracing::info!(%addr, "Starting MCP server with HTTP transport");

        let (request_tx, mut request_rx) =
            mpsc::channel::<(JsonRpcRequest, mpsc::Sender<JsonRpcResponse>)>(100);

        // Request handler task; the server state is cheap to clone.
        let server = self.clone();
        tokio::spawn(async move {
            while let Some((request, response_tx)) = request_rx.recv().await {
                let response = server.handle_request(request).await;
                let _ = response_tx.send(response).await;
            }
        });

        let http_server = HttpServer::new(addr, request_tx);
        http_server.run().await
    }

    /// Handle a JSON-RPC request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            "shutdown" => self.handle_shutdown(id),
            _ => JsonRpcResponse::error(id, -32601, format!("Method not found: {}", request.method)),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = json!({
            "protocolVersion": "2024-11-05",
            "serverInfo": {
                "name": "rollback-mcp",
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {
                "tools": {}
            }
        });
        JsonRpcResponse::success(id, result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools: Vec<_> = self
            .tools
            .list()
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema,
                })
            })
            .collect();

        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, -32602, format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, -32602, "Missing params"),
        };

        if params.name != ROLLBACK_TOOL || !self.tools.contains(&params.name) {
            return JsonRpcResponse::error(id, -32602, format!("Tool not found: {}", params.name));
        }

        let cancel = self.shutdown.child_token();
        let result = self.engine.handle(params.arguments, &cancel).await;

        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, -32603, format!("Serialization error: {}", e)),
        }
    }

    fn handle_shutdown(&self, id: Option<Value>) -> JsonRpcResponse {
        tracing::info!("MCP server shutdown requested");
        self.shutdown.cancel();
        JsonRpcResponse::success(id, json!(null))
    }
}
