//! The `tools` subcommand: ask the server for its tool list.

use anyhow::Context;
use jp_mcp_client::McpSession;

use crate::config::ProbeConfig;

pub async fn run(config: ProbeConfig, json: bool) -> anyhow::Result<()> {
    let mut session = McpSession::connect(&config.server)
        .await
        .context("connecting to MCP server")?;

    let tools = session.list_tools().await;
    session.close().await;
    let tools = tools.context("listing tools")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tools)?);
    } else if tools.is_empty() {
        println!("no tools reported");
    } else {
        for tool in &tools {
            if tool.description.is_empty() {
                println!("{}", tool.name);
            } else {
                println!("{:<24} {}", tool.name, tool.description);
            }
        }
    }
    Ok(())
}
