//! CLI argument validation functions
//!
//! This module provides custom validation functions for CLI arguments
//! that go beyond what clap can validate automatically.

use std::fs;
use std::path::PathBuf;

use crate::config;

/// Validate that a configuration directory exists and can be listed
pub fn validate_config_dir(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration directory does not exist: '{}'", path_str));
    }

    if !path.is_dir() {
        return Err(format!("Configuration path is not a directory: '{}'", path_str));
    }

    match fs::read_dir(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read configuration directory '{}': {}", path_str, e)),
    }
}

/// Validate that an environment name can name a configuration file
///
/// Applies the same rule the resolver enforces.
pub fn validate_environment_name(name_str: &str) -> Result<String, String> {
    config::validate_environment_name(name_str)
        .map(str::to_string)
        .map_err(|e| e.to_string())
}
