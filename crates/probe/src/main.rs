use clap::Parser;
use tracing_subscriber::EnvFilter;

use jp_probe::cli::{self, Cli, Command, ConfigCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_cli_tracing();
    let cli = Cli::parse();

    match cli.command {
        // Default to a full suite run when no subcommand is given.
        None => {
            let (config, _) = cli::load_config()?;
            cli::run::run(config, vec![], None, false).await
        }
        Some(Command::Run {
            tools,
            date,
            command,
            args,
            timeout,
            json,
        }) => {
            let (mut config, _) = cli::load_config()?;
            cli::apply_server_overrides(&mut config, command, args, timeout);
            cli::run::run(config, tools, date, json).await
        }
        Some(Command::Tools {
            command,
            args,
            timeout,
            json,
        }) => {
            let (mut config, _) = cli::load_config()?;
            cli::apply_server_overrides(&mut config, command, args, timeout);
            cli::tools::run(config, json).await
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            let (config, config_path) = cli::load_config()?;
            let valid = cli::config::validate(&config, &config_path);
            if !valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let (config, _config_path) = cli::load_config()?;
            cli::config::show(&config);
            Ok(())
        }
        Some(Command::Init) => cli::init::init(),
        Some(Command::Version) => {
            println!("jobber-probe {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Initialize compact stderr-only tracing.
///
/// Defaults to `warn` level so diagnostic output does not pollute the
/// report on stdout.
fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
