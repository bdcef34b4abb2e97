//! End-to-end runs of the jobber-probe binary against the mock server.

use std::path::Path;
use std::process::{Command, Output};

fn probe() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jobber-probe"))
}

fn mock_path() -> &'static str {
    env!("CARGO_BIN_EXE_mock-jobber-server")
}

/// Run the probe with `JP_CONFIG` pointed at `config_path` (which may
/// not exist, selecting the built-in defaults).
fn run_probe(config_path: &Path, args: &[&str]) -> Output {
    probe()
        .args(args)
        .env("JP_CONFIG", config_path)
        .output()
        .unwrap()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn run_json_outputs_a_full_report() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_probe(
        &dir.path().join("probe.toml"),
        &["run", "--json", "--command", mock_path()],
    );

    assert!(output.status.success(), "{output:?}");
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["passed"], 5);
    assert_eq!(report["failed"], 0);
    assert_eq!(report["cases"].as_array().unwrap().len(), 5);
    assert_eq!(report["cases"][0]["tool"], "get_daily_revenue");
    assert_eq!(report["server"], mock_path());
}

#[test]
fn human_output_shows_banner_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_probe(
        &dir.path().join("probe.toml"),
        &["run", "--command", mock_path()],
    );

    assert!(output.status.success(), "{output:?}");
    let stdout = stdout_of(&output);
    assert!(stdout.contains("jobber-probe live suite"), "{stdout}");
    assert!(stdout.contains("[PASS] get_daily_revenue"), "{stdout}");
    assert!(stdout.contains("5 passed, 0 failed (5 total)"), "{stdout}");
}

#[test]
fn failing_case_sets_exit_code_one() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("probe.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[server]
command = "{}"

[[case]]
tool = "get_quantum_flux"

[[case]]
tool = "get_ar_aging"
"#,
            mock_path()
        ),
    )
    .unwrap();

    let output = run_probe(&config_path, &["run"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("[FAIL] get_quantum_flux"), "{stdout}");
    assert!(stdout.contains("[PASS] get_ar_aging"), "{stdout}");
    assert!(stdout.contains("1 passed, 1 failed (2 total)"), "{stdout}");
}

#[test]
fn tool_filter_selects_a_subset() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_probe(
        &dir.path().join("probe.toml"),
        &[
            "run",
            "--json",
            "--command",
            mock_path(),
            "--tool",
            "get_ar_aging",
        ],
    );

    assert!(output.status.success(), "{output:?}");
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let cases = report["cases"].as_array().unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0]["tool"], "get_ar_aging");
}

#[test]
fn unknown_tool_filter_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_probe(
        &dir.path().join("probe.toml"),
        &["run", "--command", mock_path(), "--tool", "nonsense"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no case matches"), "{stderr}");
}

#[test]
fn date_override_reaches_the_server() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_probe(
        &dir.path().join("probe.toml"),
        &[
            "run",
            "--json",
            "--command",
            mock_path(),
            "--date",
            "2025-10-16",
        ],
    );

    assert!(output.status.success(), "{output:?}");
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["cases"][0]["payload"]["date"], "2025-10-16");
}

#[test]
fn tools_subcommand_lists_server_tools() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_probe(
        &dir.path().join("probe.toml"),
        &["tools", "--command", mock_path()],
    );

    assert!(output.status.success(), "{output:?}");
    let stdout = stdout_of(&output);
    assert!(stdout.contains("get_revenue_metrics"), "{stdout}");
    assert!(stdout.contains("aging buckets"), "{stdout}");
}

#[test]
fn config_validate_accepts_the_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_probe(&dir.path().join("probe.toml"), &["config", "validate"]);

    assert!(output.status.success(), "{output:?}");
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Config OK"), "{stdout}");
    assert!(
        stdout.contains("server: python3 mcp-server/jobber_server.py"),
        "{stdout}"
    );
    assert!(stdout.contains("cases:  5"), "{stdout}");
}

#[test]
fn config_validate_rejects_an_empty_command() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("probe.toml");
    std::fs::write(&config_path, "[server]\ncommand = \"\"\n").unwrap();

    let output = run_probe(&config_path, &["config", "validate"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).contains("server.command"));
}

#[test]
fn config_show_renders_the_resolved_toml() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_probe(&dir.path().join("probe.toml"), &["config", "show"]);

    assert!(output.status.success(), "{output:?}");
    let stdout = stdout_of(&output);
    assert!(
        stdout.starts_with("# jobber-probe resolved config"),
        "{stdout}"
    );
    assert!(stdout.contains("command = \"python3\""), "{stdout}");
    assert!(stdout.contains("[[case]]"), "{stdout}");
}

#[test]
fn init_scaffolds_probe_toml_once() {
    let dir = tempfile::tempdir().unwrap();

    let output = probe()
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    assert!(dir.path().join("probe.toml").exists());

    let output = probe()
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn version_prints_the_package_version() {
    let output = probe().arg("version").output().unwrap();

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("jobber-probe"), "{stdout}");
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "{stdout}");
}
