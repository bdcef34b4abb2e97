//! Stand-in Jobber MCP server for integration tests.
//!
//! Speaks JSON-RPC over stdio and answers the five reporting tools with
//! canned data. Extra fixture tools return broken or unusual results,
//! and environment toggles simulate transport-level trouble:
//!
//! - `MOCK_SILENT`: read one line, then exit without answering.
//! - `MOCK_STALL`: read one line, then never answer.
//! - `MOCK_NOISY`: print a log line, a blank line, and a response to an
//!   id nobody asked for ahead of every real answer.
//! - `MOCK_FLOOD`: read one line, then print nothing but log lines.

use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

fn main() {
    if std::env::var("MOCK_SILENT").is_ok() {
        let mut line = String::new();
        let _ = io::stdin().read_line(&mut line);
        return;
    }
    if std::env::var("MOCK_STALL").is_ok() {
        let mut line = String::new();
        let _ = io::stdin().read_line(&mut line);
        std::thread::sleep(std::time::Duration::from_secs(3600));
        return;
    }
    if std::env::var("MOCK_FLOOD").is_ok() {
        let mut line = String::new();
        let _ = io::stdin().read_line(&mut line);
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for attempt in 0..1100 {
            let _ = writeln!(out, "jobber-mcp: retrying upstream request (attempt {attempt})");
        }
        let _ = out.flush();
        return;
    }

    let noisy = std::env::var("MOCK_NOISY").is_ok();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let msg: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(_) => continue,
        };

        // Notifications have no "id" member and get no answer.
        if msg.get("id").is_none() {
            continue;
        }

        let id = msg["id"].clone();
        let method = msg["method"].as_str().unwrap_or("");

        let response = match method {
            "initialize" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": { "tools": {} },
                    "serverInfo": { "name": "mock-jobber", "version": "0.1.0" }
                }
            }),
            "tools/list" => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": { "tools": tool_list() }
            }),
            "tools/call" => {
                let name = msg["params"]["name"].as_str().unwrap_or("");
                let args = &msg["params"]["arguments"];
                tool_call_response(id, name, args)
            }
            _ => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": "Method not found" }
            }),
        };

        if noisy {
            writeln!(out, "jobber-mcp: refreshed OAuth token").unwrap();
            writeln!(out).unwrap();
            writeln!(out, "{}", json!({ "jsonrpc": "2.0", "id": 999, "result": {} })).unwrap();
        }
        writeln!(out, "{}", response).unwrap();
        out.flush().unwrap();
    }
}

fn tool_call_response(id: Value, name: &str, args: &Value) -> Value {
    let payload = match name {
        "get_daily_revenue" => json!({
            "date": args["date"].as_str().unwrap_or("unknown"),
            "total_revenue": 4850.0,
            "invoice_count": 7,
            "payments_collected": 3120.5
        }),
        "get_membership_counts" => json!({
            "active": 182,
            "paused": 9,
            "cancelled_this_month": 4
        }),
        "get_ar_aging" => json!({
            "current": 12450.0,
            "days_1_30": 3200.0,
            "days_31_60": 1100.0,
            "days_61_plus": 640.0
        }),
        "get_revenue_metrics" => json!({
            "mtd_revenue": 98400.0,
            "qtd_revenue": 254800.0,
            "ytd_revenue": 1032000.0
        }),
        "get_business_kpis" => json!({
            "average_ticket": 412.0,
            "close_rate": 0.61,
            "memberships_sold_mtd": 14
        }),
        // Failure fixtures.
        "tool_error" => {
            return json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "content": [{ "type": "text", "text": "simulated tool failure" }],
                    "isError": true
                }
            });
        }
        "broken_payload" => {
            return json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "content": [{ "type": "text", "text": "Traceback (most recent call last): boom" }],
                    "isError": false
                }
            });
        }
        "empty_payload" => {
            return json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "content": [{ "type": "text", "text": "" }],
                    "isError": false
                }
            });
        }
        "bare_result" => {
            return json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": { "status": "ok" }
            });
        }
        _ => {
            return json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32602, "message": format!("Unknown tool: {name}") }
            });
        }
    };

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "content": [{ "type": "text", "text": payload.to_string() }],
            "isError": false
        }
    })
}

fn tool_list() -> Value {
    json!([
        {
            "name": "get_daily_revenue",
            "description": "Revenue collected on a given date",
            "inputSchema": {
                "type": "object",
                "properties": { "date": { "type": "string" } },
                "required": ["date"]
            }
        },
        {
            "name": "get_membership_counts",
            "description": "Active membership counts",
            "inputSchema": { "type": "object" }
        },
        {
            "name": "get_ar_aging",
            "description": "Accounts receivable aging buckets",
            "inputSchema": { "type": "object" }
        },
        {
            "name": "get_revenue_metrics",
            "description": "Month, quarter, and year to date revenue",
            "inputSchema": { "type": "object" }
        },
        {
            "name": "get_business_kpis",
            "description": "Headline business KPIs",
            "inputSchema": { "type": "object" }
        }
    ])
}
