//! Command executor
//!
//! Resolves the configuration selected by the parsed CLI arguments and
//! renders it for printing.

use anyhow::Context;

use super::parser::{Cli, OutputFormat};
use super::validation::validate_config_dir;
use crate::config::{Resolver, Settings};

/// Resolve configuration for `cli` and render it in the requested format
///
/// Secret fields are masked unless `--show-secrets` was given.
///
/// # Errors
/// Returns an error if resolution or serialization fails
pub fn execute_command(cli: &Cli) -> anyhow::Result<String> {
    validate_config_dir(&cli.dir.to_string_lossy()).map_err(anyhow::Error::msg)?;

    let resolver = Resolver::new(&cli.dir, &cli.env);
    let settings = resolver.resolve().with_context(|| {
        format!(
            "Failed to resolve configuration for environment '{}' in '{}'",
            cli.env,
            cli.dir.display()
        )
    })?;

    let settings = if cli.show_secrets {
        settings
    } else {
        settings.redacted()
    };

    render(&settings, cli.format)
}

/// Serialize settings as pretty JSON or TOML
pub fn render(settings: &Settings, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(settings).context("Failed to serialize configuration as JSON")
        }
        OutputFormat::Toml => {
            toml::to_string_pretty(settings).context("Failed to serialize configuration as TOML")
        }
    }
}
