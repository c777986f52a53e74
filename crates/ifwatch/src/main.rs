mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ifwatch_core::{ApiStore, MemoryStore, Monitor};

use crate::cli::{Cli, Command};
use crate::config::Backend;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a sample store
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "ifwatch", &mut std::io::stdout());
            Ok(())
        }

        // All other commands query samples
        cmd => {
            let cfg = config::load_config_or_default();
            let engine = config::engine_config(&cfg)?;
            let profile_name = config::active_profile_name(&cli.global, &cfg);

            tracing::debug!(command = ?cmd, "dispatching command");
            match config::resolve_backend(&cli.global, &cfg)? {
                Backend::Snapshot(path) => {
                    let store = MemoryStore::load_snapshot(&path)?;
                    let monitor = Monitor::new(store, engine);
                    commands::dispatch(cmd, &monitor, &cli.global).await
                }
                Backend::Service(store_config) => {
                    tracing::debug!(url = %store_config.url, profile = %profile_name, "using sample service");
                    let store = ApiStore::connect(&store_config)?;
                    let monitor = Monitor::new(store, engine);
                    commands::dispatch(cmd, &monitor, &cli.global)
                        .await
                        .map_err(|e| e.for_profile(&profile_name))
                }
            }
        }
    }
}
