//! Probe configuration.
//!
//! Deserialized from `probe.toml` (or the file named by `JP_CONFIG`):
//! a `[server]` table describing how to launch the Jobber MCP server,
//! followed by `[[case]]` entries naming the tools to call. When the
//! file is missing entirely, the built-in Jobber suite is used.

use std::fmt;

use jp_mcp_client::McpServerConfig;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// The MCP server under test.
    #[serde(default = "d_server")]
    pub server: McpServerConfig,

    /// Tool calls to make, one server process each, in order.
    #[serde(default = "default_suite", rename = "case")]
    pub cases: Vec<ToolCase>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            server: d_server(),
            cases: default_suite(),
        }
    }
}

/// One tool call: the tool name and its `arguments` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCase {
    /// Tool name as registered on the server (e.g. `"get_ar_aging"`).
    pub tool: String,

    /// Arguments passed in the `tools/call` request. Defaults to `{}`.
    #[serde(default = "d_empty_arguments")]
    pub arguments: Value,
}

impl ToolCase {
    /// A case with no arguments.
    pub fn bare(tool: &str) -> Self {
        Self {
            tool: tool.into(),
            arguments: d_empty_arguments(),
        }
    }
}

/// The stock Jobber suite: the five reporting tools the server exposes,
/// with `get_daily_revenue` pointed at today's date.
pub fn default_suite() -> Vec<ToolCase> {
    vec![
        ToolCase {
            tool: "get_daily_revenue".into(),
            arguments: json!({ "date": today_iso() }),
        },
        ToolCase::bare("get_membership_counts"),
        ToolCase::bare("get_ar_aging"),
        ToolCase::bare("get_revenue_metrics"),
        ToolCase::bare("get_business_kpis"),
    ]
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today_iso() -> String {
    chrono::Local::now().date_naive().to_string()
}

// ── serde default helpers ───────────────────────────────────────────

fn d_server() -> McpServerConfig {
    McpServerConfig {
        command: "python3".into(),
        args: vec!["mcp-server/jobber_server.py".into()],
        ..Default::default()
    }
}

fn d_empty_arguments() -> Value {
    json!({})
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLI overrides
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

impl ProbeConfig {
    /// Keep only the cases whose tool name appears in `names`.
    pub fn retain_tools(&mut self, names: &[String]) {
        self.cases.retain(|c| names.iter().any(|n| n == &c.tool));
    }

    /// Replace the `date` argument of every case that already has one.
    pub fn override_date(&mut self, date: &str) {
        for case in &mut self.cases {
            if let Some(obj) = case.arguments.as_object_mut() {
                if obj.contains_key("date") {
                    obj.insert("date".into(), Value::String(date.into()));
                }
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl ProbeConfig {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // A server command is required to spawn anything.
        if self.server.command.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.command".into(),
                message: "command must not be empty".into(),
            });
        }

        // A zero timeout would fail every case immediately.
        if self.server.timeout_secs == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.timeout_secs".into(),
                message: "timeout must be greater than 0".into(),
            });
        }

        // Warn when there is nothing to run.
        if self.cases.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "case".into(),
                message: "no test cases configured".into(),
            });
        }

        // Validate each case has a tool name and object arguments.
        for (i, case) in self.cases.iter().enumerate() {
            if case.tool.is_empty() {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: format!("case[{i}].tool"),
                    message: "tool name must not be empty".into(),
                });
            }
            if !case.arguments.is_object() {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: format!("case[{i}].arguments"),
                    message: "arguments must be a JSON object".into(),
                });
            }
        }

        errors
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_suite_covers_the_five_jobber_tools() {
        let config = ProbeConfig::default();
        let names: Vec<&str> = config.cases.iter().map(|c| c.tool.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "get_daily_revenue",
                "get_membership_counts",
                "get_ar_aging",
                "get_revenue_metrics",
                "get_business_kpis",
            ]
        );
        assert_eq!(config.server.command, "python3");
    }

    #[test]
    fn daily_revenue_defaults_to_today() {
        let config = ProbeConfig::default();
        let date = config.cases[0].arguments["date"].as_str().unwrap();
        assert_eq!(date, today_iso());
    }

    #[test]
    fn parses_probe_toml() {
        let raw = r#"
            [server]
            command = "python3"
            args = ["mcp-server/jobber_server.py"]
            timeout_secs = 10

            [[case]]
            tool = "get_ar_aging"

            [[case]]
            tool = "get_daily_revenue"
            [case.arguments]
            date = "2025-10-16"
        "#;
        let config: ProbeConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.server.timeout_secs, 10);
        assert_eq!(config.cases.len(), 2);
        assert_eq!(config.cases[0].tool, "get_ar_aging");
        assert_eq!(config.cases[0].arguments, json!({}));
        assert_eq!(config.cases[1].arguments["date"], "2025-10-16");
    }

    #[test]
    fn missing_case_list_falls_back_to_the_stock_suite() {
        let config: ProbeConfig = toml::from_str("[server]\ncommand = \"python3\"").unwrap();
        assert_eq!(config.cases.len(), 5);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = ProbeConfig::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: ProbeConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.cases.len(), config.cases.len());
        assert_eq!(parsed.server.command, config.server.command);
    }

    #[test]
    fn retain_tools_filters_in_place() {
        let mut config = ProbeConfig::default();
        config.retain_tools(&["get_ar_aging".into(), "get_business_kpis".into()]);
        let names: Vec<&str> = config.cases.iter().map(|c| c.tool.as_str()).collect();
        assert_eq!(names, vec!["get_ar_aging", "get_business_kpis"]);
    }

    #[test]
    fn override_date_only_touches_dated_cases() {
        let mut config = ProbeConfig::default();
        config.override_date("2025-10-16");
        assert_eq!(config.cases[0].arguments["date"], "2025-10-16");
        assert_eq!(config.cases[1].arguments, json!({}));
    }

    #[test]
    fn validate_accepts_the_defaults() {
        assert!(ProbeConfig::default().validate().is_empty());
    }

    #[test]
    fn validate_flags_empty_command_and_zero_timeout() {
        let mut config = ProbeConfig::default();
        config.server.command = String::new();
        config.server.timeout_secs = 0;
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.severity == ConfigSeverity::Error));
        assert!(errors.iter().any(|e| e.field == "server.command"));
        assert!(errors.iter().any(|e| e.field == "server.timeout_secs"));
    }

    #[test]
    fn validate_flags_non_object_arguments() {
        let mut config = ProbeConfig::default();
        config.cases = vec![ToolCase {
            tool: "get_ar_aging".into(),
            arguments: json!([1, 2, 3]),
        }];
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "case[0].arguments");
    }

    #[test]
    fn validate_warns_on_empty_suite() {
        let mut config = ProbeConfig::default();
        config.cases.clear();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].severity, ConfigSeverity::Warning);
    }
}
