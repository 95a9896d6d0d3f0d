//! `pokedex-tui`: terminal browser for the Pokedex catalog.
//!
//! Built on [ratatui](https://ratatui.rs). The catalog screen pages through
//! the roster as the list scrolls, with name and type filters; `Enter`
//! opens a detail screen with stats and the evolution chain.
//!
//! Logs are written to a file (default `/tmp/pokedex-tui.log`) to avoid
//! corrupting the terminal UI. Fetches run on background tasks that report
//! back through the action channel.

mod action;
mod app;
mod component;
mod event;
mod fetch;
mod screen;
mod screens;
mod theme;
mod tui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

/// Terminal browser for the Pokedex catalog.
#[derive(Parser, Debug)]
#[command(name = "pokedex-tui", version, about)]
struct Cli {
    /// Catalog API base URL (overrides config)
    #[arg(short = 'u', long, env = "POKEDEX_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "POKEDEX_TIMEOUT")]
    timeout: Option<u64>,

    /// Entries per page (overrides config)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u32).range(1..))]
    page_size: Option<u32>,

    /// Log file path (defaults to /tmp/pokedex-tui.log)
    #[arg(long, default_value = "/tmp/pokedex-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Writing to stdout/stderr would corrupt the
/// TUI. The returned guard must live until exit so logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pokedex_tui={log_level},pokedex_core={log_level},pokedex_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("pokedex-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Shared config file, then CLI flag overrides.
fn build_catalog_config(cli: &Cli) -> Result<pokedex_core::CatalogConfig> {
    let cfg = pokedex_config::load_config().wrap_err("failed to load config")?;
    let mut catalog = cfg.to_catalog_config()?;

    if let Some(raw) = cli.base_url.as_deref() {
        catalog.base_url = raw
            .parse()
            .wrap_err_with(|| format!("invalid base URL: {raw}"))?;
    }
    if let Some(secs) = cli.timeout {
        catalog.timeout = Duration::from_secs(secs);
    }
    if let Some(size) = cli.page_size {
        catalog.page_size = size;
    }
    Ok(catalog)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file; hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let catalog = build_catalog_config(&cli)?;
    let client = catalog.client()?;

    info!(
        base_url = %catalog.base_url,
        page_size = catalog.page_size,
        "starting pokedex-tui"
    );

    let mut app = App::new(client, catalog.page_size);
    app.run().await?;

    Ok(())
}
