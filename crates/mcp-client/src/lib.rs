//! `jp-mcp-client`: minimal MCP (Model Context Protocol) client for the
//! Jobber probe.
//!
//! This crate provides:
//! - JSON-RPC 2.0 protocol types for talking to an MCP server.
//! - A stdio transport that spawns the server as a child process and
//!   exchanges newline-delimited JSON over stdin/stdout.
//! - [`McpSession`], a sequential one-process session: spawn, optionally
//!   handshake, call a tool or list tools, terminate.
//!
//! # Usage
//!
//! ```rust,ignore
//! use jp_mcp_client::{McpServerConfig, McpSession};
//!
//! let config = McpServerConfig {
//!     command: "python3".into(),
//!     args: vec!["mcp-server/jobber_server.py".into()],
//!     ..Default::default()
//! };
//!
//! let mut session = McpSession::connect(&config).await?;
//! let result = session.call_tool("get_daily_revenue", json!({"date": "2025-10-16"})).await?;
//! session.close().await;
//! ```

pub mod config;
pub mod protocol;
pub mod session;
pub mod transport;

// Re-exports for convenience.
pub use config::McpServerConfig;
pub use protocol::{JsonRpcError, ToolCallContent, ToolCallResult, ToolDef};
pub use session::{McpError, McpSession};
pub use transport::TransportError;
