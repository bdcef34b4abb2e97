use std::path::Path;

use crate::config::today_iso;

// ── Public entry point ───────────────────────────────────────────────

/// Scaffold a `probe.toml` with the stock Jobber suite in the current
/// directory.
pub fn init() -> anyhow::Result<()> {
    init_in(Path::new("."), &today_iso())
}

// ── Core implementation (directory-parameterised for testability) ─────

fn init_in(base: &Path, date: &str) -> anyhow::Result<()> {
    let config_path = base.join("probe.toml");

    if config_path.exists() {
        anyhow::bail!("probe.toml already exists. Use a different directory or remove it first.");
    }

    std::fs::write(&config_path, render_config(date))?;

    // ── Success message ──────────────────────────────────────────────
    eprintln!();
    eprintln!("  probe.toml written.");
    eprintln!();
    eprintln!("  Next steps:");
    eprintln!("    1. Point [server] at your Jobber MCP server if it lives elsewhere");
    eprintln!("    2. Run `jobber-probe config validate` to check the file");
    eprintln!("    3. Run `jobber-probe` to execute the live suite");
    eprintln!();

    Ok(())
}

// ── Template rendering ───────────────────────────────────────────────

fn render_config(date: &str) -> String {
    format!(
        r#"# jobber-probe configuration
#
# `jobber-probe run` spawns the server once per case, sends a single
# tools/call request, prints the parsed response, and terminates the
# process before moving on.

[server]
command = "python3"
args = ["mcp-server/jobber_server.py"]
# handshake = true        # for servers that require the MCP initialize exchange
# timeout_secs = 30

# [server.env]
# JOBBER_ENV = "production"

[[case]]
tool = "get_daily_revenue"
[case.arguments]
date = "{date}"

[[case]]
tool = "get_membership_counts"

[[case]]
tool = "get_ar_aging"

[[case]]
tool = "get_revenue_metrics"

[[case]]
tool = "get_business_kpis"
"#
    )
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeConfig;

    #[test]
    fn render_config_parses_back_into_the_stock_suite() {
        let output = render_config("2025-10-16");
        let config: ProbeConfig = toml::from_str(&output).unwrap();

        assert_eq!(config.server.command, "python3");
        assert_eq!(config.cases.len(), 5);
        assert_eq!(config.cases[0].tool, "get_daily_revenue");
        assert_eq!(config.cases[0].arguments["date"], "2025-10-16");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn render_config_contains_structure() {
        let output = render_config("2025-10-16");

        assert!(output.contains("[server]"));
        assert!(output.contains("command = \"python3\""));
        assert!(output.contains("[[case]]"));
        assert!(output.contains("tool = \"get_business_kpis\""));
    }

    #[test]
    fn init_fails_when_probe_toml_exists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("probe.toml"), "existing").unwrap();

        let result = init_in(dir.path(), "2025-10-16");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("probe.toml already exists"));
    }

    #[test]
    fn init_writes_a_parsable_config() {
        let dir = tempfile::tempdir().unwrap();

        let result = init_in(dir.path(), "2025-10-16");
        assert!(result.is_ok());

        let raw = std::fs::read_to_string(dir.path().join("probe.toml")).unwrap();
        let config: ProbeConfig = toml::from_str(&raw).unwrap();
        assert_eq!(config.cases.len(), 5);
    }
}
