pub mod config;
pub mod init;
pub mod run;
pub mod tools;

use clap::{Parser, Subcommand};

use crate::config::ProbeConfig;

/// jobber-probe: a live test harness for the Jobber MCP server.
#[derive(Debug, Parser)]
#[command(name = "jobber-probe", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the tool suite against the server (default when no subcommand is given).
    Run {
        /// Probe only these tools (repeatable).
        #[arg(long = "tool")]
        tools: Vec<String>,
        /// Override the `date` argument of cases that have one (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,
        /// Override the server command from the config.
        #[arg(long)]
        command: Option<String>,
        /// Argument for --command (repeatable).
        #[arg(long = "arg", requires = "command")]
        args: Vec<String>,
        /// Override the per-response timeout in seconds.
        #[arg(long)]
        timeout: Option<u64>,
        /// Output the full report as JSON instead of human text.
        #[arg(long)]
        json: bool,
    },
    /// Ask the server which tools it exposes and list them.
    Tools {
        /// Override the server command from the config.
        #[arg(long)]
        command: Option<String>,
        /// Argument for --command (repeatable).
        #[arg(long = "arg", requires = "command")]
        args: Vec<String>,
        /// Override the per-response timeout in seconds.
        #[arg(long)]
        timeout: Option<u64>,
        /// Output the tool list as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Write a starter probe.toml in the current directory.
    Init,
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `JP_CONFIG` (or
/// `probe.toml` by default).  Returns the parsed [`ProbeConfig`] and the
/// path that was used.  A missing file means the built-in Jobber suite.
///
/// This is shared by `run`, `tools`, and `config` subcommands so the
/// logic lives in one place.
pub fn load_config() -> anyhow::Result<(ProbeConfig, String)> {
    let config_path = std::env::var("JP_CONFIG").unwrap_or_else(|_| "probe.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        ProbeConfig::default()
    };

    Ok((config, config_path))
}

/// Apply the shared `--command` / `--arg` / `--timeout` overrides.
///
/// An overriding command replaces the configured argument list too, so
/// stale arguments never leak into a different server binary.
pub fn apply_server_overrides(
    config: &mut ProbeConfig,
    command: Option<String>,
    args: Vec<String>,
    timeout: Option<u64>,
) {
    if let Some(command) = command {
        config.server.command = command;
        config.server.args = args;
    }
    if let Some(timeout) = timeout {
        config.server.timeout_secs = timeout;
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
