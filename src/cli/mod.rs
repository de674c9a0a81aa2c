//! CLI module for layerconf
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Argument validation
//! - Resolving and rendering the selected configuration

pub mod executor;
pub mod parser;
pub mod validation;

// Re-export public types for convenience
pub use executor::{execute_command, render};
pub use parser::{Cli, LogFormatArg, OutputFormat};

use crate::logger::{LoggerConfig, LoggerError, init_logger};

/// Initialize the logger from CLI flags
///
/// # Errors
/// Returns error if the logger is already initialized
pub fn init_logger_from_cli(cli: &Cli) -> Result<(), LoggerError> {
    let config = LoggerConfig::new(cli.log_level(), cli.log_format.into(), true)?;
    init_logger(config)
}
