//! Config subcommand handlers.

use dialoguer::{Input, Select};
use pokedex_config::Config;
use pokedex_core::PAGE_SIZES;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

const OUTPUT_CHOICES: [&str; 5] = ["table", "json", "json-compact", "yaml", "plain"];

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("Pokedex CLI configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let current = config::load_config_or_default();

            let base_url: String = Input::new()
                .with_prompt("Catalog API base URL")
                .default(current.api.base_url.clone())
                .validate_with(|input: &String| -> Result<(), String> {
                    url::Url::parse(input)
                        .map(|_| ())
                        .map_err(|e| format!("invalid URL: {e}"))
                })
                .interact_text()
                .map_err(prompt_err)?;

            let sizes: Vec<String> = PAGE_SIZES.iter().map(ToString::to_string).collect();
            let size_idx = Select::new()
                .with_prompt("Entries per page")
                .items(&sizes)
                .default(
                    PAGE_SIZES
                        .iter()
                        .position(|s| *s == current.catalog.page_size)
                        .unwrap_or(PAGE_SIZES.len() - 2),
                )
                .interact()
                .map_err(prompt_err)?;

            let output_idx = Select::new()
                .with_prompt("Default output format")
                .items(&OUTPUT_CHOICES)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let mut cfg = current;
            cfg.api.base_url = base_url;
            cfg.catalog.page_size = PAGE_SIZES[size_idx];
            cfg.defaults.output = OUTPUT_CHOICES[output_idx].into();

            // Reject anything core would refuse before it hits disk.
            cfg.to_catalog_config()?;
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("\n  Test it: pokedex list --limit 10");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(&global.output, &cfg, render_toml, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            let path = config::config_path();
            if matches!(global.output, OutputFormat::Json | OutputFormat::JsonCompact) {
                output::print_output(
                    &serde_json::json!({ "path": path.display().to_string() }).to_string(),
                    global.quiet,
                );
            } else {
                println!("{}", path.display());
            }
            Ok(())
        }
    }
}

fn render_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}
