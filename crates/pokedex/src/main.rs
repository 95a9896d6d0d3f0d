mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::{CommandFactory, FromArgMatches};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::DefaultedFlags;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments, remembering which display flags were defaulted
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    let defaulted = DefaultedFlags::from_matches(&matches);

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli, defaulted).await {
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

async fn run(mut cli: Cli, defaulted: DefaultedFlags) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't talk to the catalog API, and must work
        // even when the file is broken
        Command::Config(args) => {
            let cfg = config::load_config_or_default();
            if let Err(err) = config::apply_display_defaults(&mut cli.global, &cfg, defaulted) {
                tracing::warn!(error = %err, "ignoring [defaults] from config");
            }
            commands::config_cmd::handle(args, &cli.global)
        }

        // Shell completions generation
        Command::Completions(args) => {
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "pokedex", &mut std::io::stdout());
            Ok(())
        }

        // Everything else needs a client
        cmd => {
            let cfg = config::load_config()?;
            config::apply_display_defaults(&mut cli.global, &cfg, defaulted)?;
            let catalog = config::resolve(&cli.global, &cfg)?;
            let client = catalog.client()?;

            tracing::debug!(command = ?cmd, base_url = %catalog.base_url, "dispatching command");
            commands::dispatch(cmd, &client, &catalog, &cli.global).await
        }
    }
}
