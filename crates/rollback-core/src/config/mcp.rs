//! The `mcp` section of `rollback.yaml`: how the server is exposed.
//!
//! Stdio is the default so the binary can be spawned directly by an agent
//! host; the HTTP listener exists for clients that cannot manage a
//! subprocess and instead POST JSON-RPC to a long-running process.

use serde::{Deserialize, Serialize};

/// Wire transport for the JSON-RPC session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Line-delimited JSON-RPC on stdin/stdout.
    #[default]
    Stdio,
    /// JSON-RPC over an HTTP listener, with an SSE channel for streaming.
    Http,
}

/// Server transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    #[serde(default)]
    pub transport: Transport,

    /// Listen address for the HTTP transport. Ignored for stdio.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port for the HTTP transport. Ignored for stdio.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl McpConfig {
    pub fn is_stdio(&self) -> bool {
        self.transport == Transport::Stdio
    }

    pub fn is_http(&self) -> bool {
        self.transport == Transport::Http
    }

    /// The `host:port` string the HTTP listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}
