//! Sequential suite execution.
//!
//! Every case gets a fresh server process: spawn, one `tools/call`,
//! terminate, interpret the response. Failures are isolated per case so
//! one broken tool never hides the results of the others.

use std::time::Instant;

use chrono::Utc;
use jp_mcp_client::{McpServerConfig, McpSession, ToolCallResult};
use serde_json::Value;

use crate::config::{ProbeConfig, ToolCase};
use crate::report::{self, CaseOutcome, RunReport};

/// Run every configured case in order.
///
/// With `stream` set, human-readable progress goes to stdout as each
/// case finishes; `--json` callers run silently and render the returned
/// report themselves.
pub async fn run_suite(config: &ProbeConfig, stream: bool) -> RunReport {
    let started_at = Utc::now();
    let started = Instant::now();

    if stream {
        report::print_banner(&config.server.display_command());
    }

    let mut outcomes = Vec::with_capacity(config.cases.len());
    for case in &config.cases {
        if stream {
            report::print_case_start(&case.tool);
        }
        let outcome = run_case(&config.server, case).await;
        if stream {
            report::print_case_result(&outcome);
        }
        outcomes.push(outcome);
    }

    let run = RunReport::new(
        config.server.display_command(),
        started_at,
        started.elapsed(),
        outcomes,
    );
    if stream {
        report::print_summary(&run);
    }
    run
}

/// One full cycle for a single case.
pub async fn run_case(server: &McpServerConfig, case: &ToolCase) -> CaseOutcome {
    let started = Instant::now();
    tracing::info!(tool = %case.tool, "running case");

    let raw = match call_once(server, case).await {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(tool = %case.tool, %error, "case failed");
            return CaseOutcome::fail(&case.tool, error, started.elapsed());
        }
    };

    match extract_payload(raw) {
        Ok(payload) => CaseOutcome::pass(&case.tool, payload, started.elapsed()),
        Err(error) => {
            tracing::warn!(tool = %case.tool, %error, "case failed");
            CaseOutcome::fail(&case.tool, error, started.elapsed())
        }
    }
}

async fn call_once(server: &McpServerConfig, case: &ToolCase) -> Result<Value, String> {
    let mut session = McpSession::connect(server)
        .await
        .map_err(|e| e.to_string())?;

    // Terminate the process before interpreting anything, so a bad
    // response never leaks a child into the next case.
    let result = session.call_tool(&case.tool, case.arguments.clone()).await;
    session.close().await;

    result.map_err(|e| e.to_string())
}

/// Interpret a raw `tools/call` result.
///
/// Jobber tools answer with one `text` content item holding a JSON
/// document; that document is the payload. A result without content is
/// shown as-is. `isError` fails the case.
fn extract_payload(raw: Value) -> Result<Value, String> {
    if !raw.is_object() {
        return Ok(raw);
    }

    let parsed: ToolCallResult = serde_json::from_value(raw.clone())
        .map_err(|e| format!("malformed tools/call result: {e}"))?;

    if parsed.is_error {
        let detail = parsed.joined_text();
        return Err(if detail.is_empty() {
            "tool reported an error".into()
        } else {
            format!("tool reported an error: {detail}")
        });
    }

    match parsed.first_content() {
        Some(content) => {
            // Only a missing text member defaults to an empty document.
            // Present text, even an empty string, must parse as JSON.
            let text = content.text.as_deref().unwrap_or("{}");
            serde_json::from_str(text).map_err(|e| format!("tool returned non-JSON text: {e}"))
        }
        None => Ok(raw),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
