//! MCP session: one spawned server process, used sequentially and then
//! terminated.
//!
//! The probe opens a fresh session per test case: spawn, optionally
//! handshake, send one request, read one response, shut down.

use serde_json::Value;

use crate::config::McpServerConfig;
use crate::protocol::{InitializeParams, JsonRpcError, ToolDef, ToolsListResult};
use crate::transport::{StdioTransport, TransportError};

/// Errors from MCP operations.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("MCP transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a JSON-RPC `error` member.
    #[error("MCP error: {0}")]
    Rpc(JsonRpcError),

    #[error("MCP protocol error: {0}")]
    Protocol(String),
}

/// An open connection to a spawned MCP server.
pub struct McpSession {
    transport: StdioTransport,
}

impl McpSession {
    /// Spawn the server and, when `config.handshake` is set, perform the
    /// MCP `initialize` / `notifications/initialized` exchange.
    ///
    /// A failed handshake terminates the spawned process before the error
    /// is returned; the process never outlives its session.
    pub async fn connect(config: &McpServerConfig) -> Result<Self, McpError> {
        let transport = StdioTransport::spawn(config)?;
        let mut session = Self { transport };

        if config.handshake {
            if let Err(e) = session.initialize().await {
                session.close().await;
                return Err(e);
            }
        }

        Ok(session)
    }

    async fn initialize(&mut self) -> Result<(), McpError> {
        let params = serde_json::to_value(InitializeParams::for_probe()).map_err(|e| {
            McpError::Protocol(format!("failed to serialize initialize params: {e}"))
        })?;

        let resp = self
            .transport
            .send_request("initialize", Some(params))
            .await?;
        resp.into_result().map_err(McpError::Rpc)?;

        self.transport
            .send_notification("notifications/initialized")
            .await?;

        tracing::debug!("MCP handshake complete");
        Ok(())
    }

    /// Invoke one tool via `tools/call` and return the raw `result` value.
    ///
    /// An absent `result` member is normalized to an empty object. The
    /// caller interprets the MCP content envelope; the raw value is kept so
    /// whatever the server actually sent can be shown verbatim.
    pub async fn call_tool(&mut self, tool: &str, arguments: Value) -> Result<Value, McpError> {
        let params = serde_json::json!({
            "name": tool,
            "arguments": arguments,
        });

        let resp = self
            .transport
            .send_request("tools/call", Some(params))
            .await?;
        let result = resp.into_result().map_err(McpError::Rpc)?;

        Ok(if result.is_null() {
            serde_json::json!({})
        } else {
            result
        })
    }

    /// Discover the server's tools via `tools/list`.
    pub async fn list_tools(&mut self) -> Result<Vec<ToolDef>, McpError> {
        let resp = self.transport.send_request("tools/list", None).await?;
        let result = resp.into_result().map_err(McpError::Rpc)?;

        let list: ToolsListResult = serde_json::from_value(result)
            .map_err(|e| McpError::Protocol(format!("malformed tools/list result: {e}")))?;
        Ok(list.tools)
    }

    /// Terminate the server process.
    pub async fn close(self) {
        self.transport.shutdown().await;
    }
}
