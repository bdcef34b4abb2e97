//! The `run` subcommand: execute the suite and set the exit code.

use crate::config::ProbeConfig;
use crate::runner;

/// Run the configured cases, after applying `--tool` and `--date`
/// filters.  Exits with code 1 when any case fails.
pub async fn run(
    mut config: ProbeConfig,
    tools: Vec<String>,
    date: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    if !tools.is_empty() {
        let known: Vec<String> = config.cases.iter().map(|c| c.tool.clone()).collect();
        config.retain_tools(&tools);
        if config.cases.is_empty() {
            anyhow::bail!(
                "no case matches --tool (configured: {})",
                known.join(", ")
            );
        }
    }

    if let Some(date) = date {
        config.override_date(&date);
    }

    let report = runner::run_suite(&config, !json).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if !report.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}
