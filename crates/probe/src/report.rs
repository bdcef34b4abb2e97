//! Outcome types for a suite run, plus the human rendering used by
//! `jobber-probe run`. The same structs serialize to JSON for `--json`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Shapes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Verdict for a single tool case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Pass,
    Fail,
}

/// Result of one tool case: the parsed payload on success, or the
/// failure message when anything in the cycle went wrong.
#[derive(Debug, Clone, Serialize)]
pub struct CaseOutcome {
    pub tool: String,
    pub status: CaseStatus,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaseOutcome {
    pub fn pass(tool: &str, payload: Value, duration: Duration) -> Self {
        Self {
            tool: tool.into(),
            status: CaseStatus::Pass,
            duration_ms: duration.as_millis() as u64,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn fail(tool: &str, error: String, duration: Duration) -> Self {
        Self {
            tool: tool.into(),
            status: CaseStatus::Fail,
            duration_ms: duration.as_millis() as u64,
            payload: None,
            error: Some(error),
        }
    }
}

/// The whole suite run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Display form of the server command line.
    pub server: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub passed: usize,
    pub failed: usize,
    pub cases: Vec<CaseOutcome>,
}

impl RunReport {
    pub fn new(
        server: String,
        started_at: DateTime<Utc>,
        duration: Duration,
        cases: Vec<CaseOutcome>,
    ) -> Self {
        let passed = cases
            .iter()
            .filter(|c| c.status == CaseStatus::Pass)
            .count();
        let failed = cases.len() - passed;
        Self {
            server,
            started_at,
            duration_ms: duration.as_millis() as u64,
            passed,
            failed,
            cases,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Human rendering
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn print_banner(server: &str) {
    println!("jobber-probe live suite");
    println!("=======================");
    println!("server: {server}\n");
}

/// Announce a case before it runs, so slow servers still show progress.
pub fn print_case_start(tool: &str) {
    println!("{tool}");
}

pub fn print_case_result(outcome: &CaseOutcome) {
    if let Some(payload) = &outcome.payload {
        let rendered =
            serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
        println!("{rendered}");
    }
    match outcome.status {
        CaseStatus::Pass => {
            println!("  [PASS] {} ({}ms)\n", outcome.tool, outcome.duration_ms);
        }
        CaseStatus::Fail => {
            let error = outcome.error.as_deref().unwrap_or("unknown failure");
            println!(
                "  [FAIL] {}: {error} ({}ms)\n",
                outcome.tool, outcome.duration_ms
            );
        }
    }
}

pub fn print_summary(report: &RunReport) {
    println!(
        "{} passed, {} failed ({} total) in {:.1}s",
        report.passed,
        report.failed,
        report.cases.len(),
        report.duration_ms as f64 / 1000.0
    );
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
