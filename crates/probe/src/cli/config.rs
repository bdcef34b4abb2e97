//! The `config` subcommands: check or dump probe.toml without touching
//! the server.

use crate::config::{ConfigSeverity, ProbeConfig};

/// Parse and validate the config, printing any issues.
///
/// A clean config gets a short summary of the suite it describes.
/// Returns false when errors (not warnings) were found.
pub fn validate(config: &ProbeConfig, config_path: &str) -> bool {
    let issues = config.validate();

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        println!("  server: {}", config.server.display_command());
        println!("  cases:  {}", config.cases.len());
        return true;
    }

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        println!("{issue}");
    }

    println!(
        "\n{} error(s), {} warning(s) in {config_path}",
        error_count, warning_count,
    );

    error_count == 0
}

/// Print the fully resolved probe config as TOML, defaults included.
///
/// The output parses back into the same config, so it can be saved as a
/// probe.toml to edit.
pub fn show(config: &ProbeConfig) {
    match toml::to_string_pretty(config) {
        Ok(output) => {
            println!("# jobber-probe resolved config");
            print!("{output}");
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {e}");
            std::process::exit(1);
        }
    }
}
