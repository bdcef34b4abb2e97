//! Configuration for the MCP server under test.
//!
//! Deserialized from the `[server]` table of the probe config. One stdio
//! server per config; the probe spawns a fresh process from it for every
//! test case.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How to launch and talk to the MCP server process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpServerConfig {
    /// The command to spawn (e.g. `"python3"`).
    pub command: String,

    /// Arguments to pass to the command.
    #[serde(default)]
    pub args: Vec<String>,

    /// Perform the MCP `initialize` handshake before the first request.
    /// The Jobber server answers a bare first request, so this is off by
    /// default; strict MCP servers need it on.
    #[serde(default)]
    pub handshake: bool,

    /// Seconds to wait for each response line before giving up.
    #[serde(default = "d_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra environment variables for the spawned process.
    /// Kept last so the struct serializes cleanly to TOML.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            args: Vec::new(),
            handshake: false,
            timeout_secs: d_timeout_secs(),
            env: HashMap::new(),
        }
    }
}

impl McpServerConfig {
    /// The command line as a single display string (for logs and reports).
    pub fn display_command(&self) -> String {
        let mut parts = Vec::with_capacity(1 + self.args.len());
        parts.push(self.command.clone());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_timeout_secs() -> u64 {
    30
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_toml() {
        let cfg: McpServerConfig = toml::from_str(r#"command = "python3""#).unwrap();
        assert_eq!(cfg.command, "python3");
        assert!(cfg.args.is_empty());
        assert!(cfg.env.is_empty());
        assert!(!cfg.handshake);
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn parses_full_toml() {
        let raw = r#"
            command = "python3"
            args = ["mcp-server/jobber_server.py"]
            handshake = true
            timeout_secs = 5

            [env]
            JOBBER_ENV = "staging"
        "#;
        let cfg: McpServerConfig = toml::from_str(raw).unwrap();
        assert_eq!(cfg.args, vec!["mcp-server/jobber_server.py"]);
        assert!(cfg.handshake);
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.env.get("JOBBER_ENV").unwrap(), "staging");
    }

    #[test]
    fn display_command_joins_args() {
        let cfg = McpServerConfig {
            command: "python3".into(),
            args: vec!["mcp-server/jobber_server.py".into()],
            ..Default::default()
        };
        assert_eq!(cfg.display_command(), "python3 mcp-server/jobber_server.py");
    }
}
