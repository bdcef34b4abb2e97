//! Stdio transport: one spawned MCP server process, newline-delimited
//! JSON-RPC over its stdin/stdout.
//!
//! The probe runs strictly sequential, one process per test case, so the
//! transport is owned and mutable rather than shared: no locks, no request
//! interleaving. The process is always terminated by [`StdioTransport::shutdown`]
//! before the next case starts.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout};
use tokio::time::Duration;

use crate::config::McpServerConfig;
use crate::protocol::{JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};

/// Maximum non-JSON stdout lines to skip before declaring the server broken.
const MAX_SKIP_LINES: usize = 1000;

/// How long a server gets to exit on its own after stdin closes.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Errors that can occur while talking to the server process.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no response from MCP server (process exited)")]
    ProcessExited,

    #[error("timed out after {0}s waiting for a response")]
    Timeout(u64),
}

/// A spawned MCP server process plus its pipe ends.
pub struct StdioTransport {
    child: Child,
    /// `None` once stdin has been closed during shutdown.
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    next_id: u64,
    timeout: Duration,
}

impl StdioTransport {
    /// Spawn the server process described by `config`.
    ///
    /// Stderr is drained in the background into `tracing` debug events so a
    /// chatty server can never fill the pipe and stall.
    pub fn spawn(config: &McpServerConfig) -> Result<Self, TransportError> {
        let mut cmd = tokio::process::Command::new(&config.command);
        cmd.args(&config.args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            // Normal termination goes through `shutdown`; this covers
            // transports dropped on error paths.
            .kill_on_drop(true);

        for (key, value) in &config.env {
            cmd.env(key, value);
        }

        tracing::debug!(command = %config.display_command(), "spawning MCP server");
        let mut child = cmd.spawn()?;

        let stdin = child.stdin.take().ok_or_else(|| {
            TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "failed to capture child stdin",
            ))
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "failed to capture child stdout",
            ))
        })?;

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::debug!(line = %line, "MCP server stderr");
                }
            });
        }

        Ok(Self {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout),
            next_id: 1,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Send a request and wait for the response with a matching id.
    ///
    /// Stray notifications and responses to other ids are skipped; the wait
    /// is bounded by the configured timeout.
    pub async fn send_request(
        &mut self,
        method: &str,
        params: Option<Value>,
    ) -> Result<JsonRpcResponse, TransportError> {
        let id = self.next_id;
        self.next_id += 1;

        let req = JsonRpcRequest::new(id, method, params);
        let json = serde_json::to_string(&req)?;

        tracing::debug!(id, method, "sending MCP request");
        self.write_line(&json).await?;

        let timeout = self.timeout;
        let result = tokio::time::timeout(timeout, async {
            loop {
                let line = self.read_json_line().await?;
                if let Ok(resp) = serde_json::from_str::<JsonRpcResponse>(&line) {
                    if resp.id == id {
                        return Ok(resp);
                    }
                    tracing::debug!(
                        expected_id = id,
                        got_id = resp.id,
                        "response for a different request, continuing"
                    );
                    continue;
                }
                tracing::debug!(line = %line, "skipping non-response message");
            }
        })
        .await;

        match result {
            Ok(inner) => inner,
            Err(_) => Err(TransportError::Timeout(timeout.as_secs())),
        }
    }

    /// Send a notification; nothing is read back.
    pub async fn send_notification(&mut self, method: &str) -> Result<(), TransportError> {
        let notif = JsonRpcNotification::new(method);
        let json = serde_json::to_string(&notif)?;
        tracing::debug!(method, "sending MCP notification");
        self.write_line(&json).await
    }

    /// Terminate the server process: close stdin, give it a moment to exit
    /// on its own, then kill.
    pub async fn shutdown(mut self) {
        drop(self.stdin.take());

        match tokio::time::timeout(SHUTDOWN_GRACE, self.child.wait()).await {
            Ok(Ok(status)) => {
                tracing::debug!(?status, "MCP server exited");
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "error waiting for MCP server to exit");
            }
            Err(_) => {
                tracing::debug!("MCP server still running after grace period, killing");
                if let Err(e) = self.child.kill().await {
                    tracing::warn!(error = %e, "failed to kill MCP server");
                }
            }
        }
    }

    /// Write one newline-terminated line to the server's stdin.
    async fn write_line(&mut self, json: &str) -> Result<(), TransportError> {
        let stdin = self.stdin.as_mut().ok_or(TransportError::ProcessExited)?;
        stdin.write_all(json.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;
        Ok(())
    }

    /// Read the next line that looks like a JSON object.
    ///
    /// Empty lines and stray non-JSON output (logging leaking onto stdout)
    /// are skipped, up to [`MAX_SKIP_LINES`]. EOF means the server exited
    /// without answering.
    async fn read_json_line(&mut self) -> Result<String, TransportError> {
        let mut skipped = 0usize;
        loop {
            let mut line = String::new();
            let bytes_read = self.stdout.read_line(&mut line).await?;
            if bytes_read == 0 {
                return Err(TransportError::ProcessExited);
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('{') {
                return Ok(trimmed.to_string());
            }
            skipped += 1;
            if skipped >= MAX_SKIP_LINES {
                return Err(TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "MCP server produced too many non-JSON lines on stdout",
                )));
            }
            tracing::debug!(line = %trimmed, "skipping non-JSON line from MCP server stdout");
        }
    }
}
