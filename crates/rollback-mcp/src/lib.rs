//! # rollback-mcp
//!
//! MCP (Model Context Protocol) server exposing a single tool,
//! `run_rollback_pipeline`, that walks an agent through rolling back a
//! CircleCI deployment.
//!
//! ## Architecture
//!
//! ```text
//! AI Agent (Claude, GPT, etc.)
//!       │
//!       │ MCP protocol (list tools / call tool)
//!       ▼
//! ┌──────────────────────┐
//! │  Rollback MCP Server │
//! │  1. Parse arguments  │
//! │  2. Resolve project  │
//! │  3. Check capability │
//! │  4. Resolve component│
//! │     + environment    │
//! │  5. List versions or │
//! │     execute rollback │
//! └──────────┬───────────┘
//!            │ rollback-client
//!            ▼
//!     CircleCI v2 API
//! ```
//!
//! The tool is a stateless wizard: each invocation re-resolves everything
//! from the parameters supplied in that call, and either executes, prompts
//! for the next missing parameter, or fails with a structured error. The
//! agent owns the loop.

pub mod engine;
pub mod error;
pub mod http_transport;
pub mod protocol;
pub mod server;
pub mod tools;

// Re-export main types
pub use engine::{Outcome, RollbackEngine};
pub use error::McpError;
pub use protocol::{
    CallToolParams, JsonRpcRequest, JsonRpcResponse, ToolCallResult, ToolContent, ToolDefinition,
};
pub use server::McpServer;
pub use tools::ToolRegistry;
