//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::overlay::APP_ENV_VAR;
use crate::config::resolver::{CONFIG_DIR_ENV, DEFAULT_CONFIG_DIR};
use crate::logger::LogFormat;

/// Resolve layered service configuration and print the result
#[derive(Parser, Debug)]
#[command(name = "layerconf")]
#[command(about = "Resolve layered service configuration and print the result")]
#[command(long_about = "
layerconf reads main.<ext> and <env>.<ext> from a configuration directory,
deep-merges the environment file over the base file, fills in defaults for
unset keys and overlays secrets from the process environment and .env.

EXAMPLES:
    # Resolve ./configs for the test environment
    layerconf --env test

    # Resolve another directory and print TOML
    layerconf --dir /etc/app --env production --format toml

    # Include secret values in the output
    layerconf --env test --show-secrets
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Configuration directory
    ///
    /// Must contain main.<ext>, <env>.<ext> and optionally .env.
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = CONFIG_DIR_ENV,
        default_value = DEFAULT_CONFIG_DIR
    )]
    pub dir: PathBuf,

    /// Environment name
    ///
    /// Selects the <env>.<ext> file merged over main.<ext>.
    #[arg(
        short,
        long,
        value_name = "NAME",
        env = APP_ENV_VAR,
        value_parser = super::validation::validate_environment_name
    )]
    pub env: String,

    /// Output format for the resolved configuration
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Print secret values instead of masking them
    #[arg(long)]
    pub show_secrets: bool,

    /// Enable verbose logging
    ///
    /// Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress everything but errors in the log
    ///
    /// Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(long, value_enum, value_name = "FORMAT", default_value_t = LogFormatArg::Full)]
    pub log_format: LogFormatArg,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    #[value(name = "json")]
    Json,
    #[value(name = "toml")]
    Toml,
}

/// Log format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    #[value(name = "full")]
    Full,
    #[value(name = "compact")]
    Compact,
    #[value(name = "json")]
    Json,
}

impl Cli {
    /// Log level implied by --verbose / --quiet
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Full => LogFormat::Full,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::{EnvGuard, lock_env, setup_config_dir};
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_flag() {
        let result = Cli::try_parse_from(["layerconf", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["layerconf", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_explicit_arguments() {
        let _guard = lock_env();
        let dir = setup_config_dir(&[]);
        let dir_arg = dir.path().to_str().unwrap();

        let cli = Cli::try_parse_from([
            "layerconf", "--dir", dir_arg, "--env", "test", "--format", "toml", "--show-secrets",
        ])
        .unwrap();

        assert_eq!(cli.dir, dir.path());
        assert_eq!(cli.env, "test");
        assert_eq!(cli.format, OutputFormat::Toml);
        assert!(cli.show_secrets);
        assert_eq!(cli.log_format, LogFormatArg::Full);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_arguments_from_environment() {
        let _guard = lock_env();
        let mut env = EnvGuard::new();
        let dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, dir.path().to_str().unwrap());
        env.set(APP_ENV_VAR, "staging");

        let cli = Cli::try_parse_from(["layerconf"]).unwrap();
        assert_eq!(cli.dir, dir.path());
        assert_eq!(cli.env, "staging");
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(!cli.show_secrets);
    }

    #[test]
    fn test_environment_is_required() {
        let _guard = lock_env();
        let mut env = EnvGuard::new();
        let dir = setup_config_dir(&[]);
        env.remove(APP_ENV_VAR);

        let result = Cli::try_parse_from(["layerconf", "--dir", dir.path().to_str().unwrap()]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_default_directory() {
        let _guard = lock_env();
        let mut env = EnvGuard::new();
        env.remove(CONFIG_DIR_ENV);

        let cli = Cli::try_parse_from(["layerconf", "--env", "test"]).unwrap();
        assert_eq!(cli.dir, PathBuf::from(DEFAULT_CONFIG_DIR));
    }

    #[test]
    fn test_blank_environment_rejected() {
        let _guard = lock_env();
        let result = Cli::try_parse_from(["layerconf", "--env", "  "]);
        assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_verbose_and_quiet_levels() {
        let _guard = lock_env();
        let dir = setup_config_dir(&[]);
        let dir_arg = dir.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["layerconf", "-d", dir_arg, "-e", "test", "--verbose"]).unwrap();
        assert_eq!(cli.log_level(), "debug");

        let cli = Cli::try_parse_from(["layerconf", "-d", dir_arg, "-e", "test", "--quiet"]).unwrap();
        assert_eq!(cli.log_level(), "error");
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let _guard = lock_env();
        let dir = setup_config_dir(&[]);
        let result = Cli::try_parse_from([
            "layerconf", "-d", dir.path().to_str().unwrap(), "-e", "test", "--verbose", "--quiet",
        ]);
        assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_log_format_conversion() {
        assert_eq!(LogFormat::from(LogFormatArg::Json), LogFormat::Json);
        assert_eq!(LogFormat::from(LogFormatArg::Compact), LogFormat::Compact);
    }
}
