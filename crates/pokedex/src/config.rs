//! CLI-side configuration: layers `GlobalOpts` over the shared config file
//! and hands a ready `CatalogConfig` to core.

use std::time::Duration;

use clap::ArgMatches;
use clap::ValueEnum;
use clap::parser::ValueSource;
use pokedex_config::Config;
use pokedex_core::CatalogConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use pokedex_config::{config_path, load_config, load_config_or_default, save_config};

/// Resolve the effective catalog settings (flag > env > file > default).
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<CatalogConfig, CliError> {
    let mut catalog = cfg.to_catalog_config()?;

    if let Some(ref raw) = global.base_url {
        catalog.base_url = raw.parse().map_err(|_| CliError::Validation {
            field: "base-url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
    }

    if let Some(secs) = global.timeout {
        catalog.timeout = Duration::from_secs(secs);
    }

    if let Some(size) = global.catalog_size {
        if size == 0 {
            return Err(CliError::Validation {
                field: "catalog-size".into(),
                reason: "must be greater than zero".into(),
            });
        }
        catalog.catalog_size = size;
    }

    Ok(catalog)
}

// ── Display defaults ────────────────────────────────────────────────

/// Display flags left at their clap defaults (not given on the command
/// line or through the environment).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultedFlags {
    pub output: bool,
    pub color: bool,
}

impl DefaultedFlags {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let defaulted = |id: &str| {
            matches!(
                matches.value_source(id),
                None | Some(ValueSource::DefaultValue)
            )
        };
        Self {
            output: defaulted("output"),
            color: defaulted("color"),
        }
    }
}

/// Fill display flags the user did not set from the `[defaults]` table.
pub fn apply_display_defaults(
    global: &mut GlobalOpts,
    cfg: &Config,
    defaulted: DefaultedFlags,
) -> Result<(), CliError> {
    if defaulted.output {
        global.output = OutputFormat::from_str(&cfg.defaults.output, true).map_err(|_| {
            CliError::Validation {
                field: "defaults.output".into(),
                reason: format!("unknown output format '{}'", cfg.defaults.output),
            }
        })?;
    }
    if defaulted.color {
        global.color = ColorMode::from_str(&cfg.defaults.color, true).map_err(|_| {
            CliError::Validation {
                field: "defaults.color".into(),
                reason: format!("unknown color mode '{}'", cfg.defaults.color),
            }
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["pokedex"];
        argv.extend_from_slice(args);
        argv.push("types");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_file_values() {
        let global = global(&["--base-url", "http://localhost:3000", "--timeout", "5"]);
        let catalog = resolve(&global, &Config::default()).unwrap();

        assert_eq!(catalog.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(catalog.timeout, Duration::from_secs(5));
        assert_eq!(catalog.catalog_size, 151);
    }

    fn parse(args: &[&str]) -> (GlobalOpts, DefaultedFlags) {
        use clap::{CommandFactory, FromArgMatches};

        let mut argv = vec!["pokedex"];
        argv.extend_from_slice(args);
        argv.push("types");
        let matches = Cli::command().try_get_matches_from(argv).unwrap();
        let cli = Cli::from_arg_matches(&matches).unwrap();
        (cli.global, DefaultedFlags::from_matches(&matches))
    }

    #[test]
    fn file_defaults_fill_unset_display_flags() {
        let mut cfg = Config::default();
        cfg.defaults.output = "yaml".into();
        cfg.defaults.color = "never".into();

        let (mut global, defaulted) = parse(&[]);
        apply_display_defaults(&mut global, &cfg, defaulted).unwrap();
        assert!(matches!(global.output, OutputFormat::Yaml));
        assert!(matches!(global.color, ColorMode::Never));

        let (mut global, defaulted) = parse(&["-o", "json"]);
        apply_display_defaults(&mut global, &cfg, defaulted).unwrap();
        assert!(matches!(global.output, OutputFormat::Json));
    }

    #[test]
    fn unknown_default_output_is_rejected() {
        let mut cfg = Config::default();
        cfg.defaults.output = "xml".into();
        let (mut global, defaulted) = parse(&[]);
        let err = apply_display_defaults(&mut global, &cfg, defaulted).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_base_url_flag_is_a_usage_error() {
        let global = global(&["--base-url", "not a url"]);
        let err = resolve(&global, &Config::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
