//! Configuration resolver
//!
//! This module provides the [`Resolver`] struct that turns a configuration
//! directory and an environment name into [`Settings`].

use std::path::{Path, PathBuf};

use crate::config::defaults::seed_defaults;
use crate::config::error::ConfigError;
use crate::config::overlay::{self, DOTENV_FILE, Secrets};
use crate::config::settings::Settings;
use crate::config::tree::ConfigTree;

/// Environment variable for the configuration directory
pub const CONFIG_DIR_ENV: &str = "LAYERCONF_CONFIG_DIR";

/// Default configuration directory
pub const DEFAULT_CONFIG_DIR: &str = "configs";

/// Base configuration file name, without extension
const BASE_CONFIG_NAME: &str = "main";

/// Resolves layered configuration for one environment
///
/// Sources, in order of precedence (lowest to highest):
/// 1. Static defaults, for keys no file sets
/// 2. `main.<ext>` - base configuration (required)
/// 3. `{environment}.<ext>` - environment configuration (required)
/// 4. `PASSWORD_SALT`, `JWT_SECRET_KEY`, `HTTP_HOST` and `APP_ENV`, from the
///    process environment after loading `.env` from the same directory
#[derive(Debug, Clone)]
pub struct Resolver {
    /// Configuration directory path
    config_dir: PathBuf,
    /// Environment name, also the environment file's base name
    environment: String,
    /// Dotenv file name inside `config_dir`
    dotenv_file: String,
}

impl Resolver {
    /// Create a resolver for `config_dir` and `environment`
    pub fn new(config_dir: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            config_dir: config_dir.into(),
            environment: environment.into(),
            dotenv_file: DOTENV_FILE.to_string(),
        }
    }

    /// Create a resolver from the process environment
    ///
    /// The directory comes from `LAYERCONF_CONFIG_DIR` (default `configs`) and
    /// the environment name from `APP_ENV`.
    pub fn from_env() -> Self {
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));
        let environment = std::env::var(overlay::APP_ENV_VAR).unwrap_or_default();

        Self::new(config_dir, environment)
    }

    /// Use a different dotenv file name inside the configuration directory
    pub fn with_dotenv_file(mut self, name: impl Into<String>) -> Self {
        self.dotenv_file = name.into();
        self
    }

    /// Get the configuration directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the environment name
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Get the dotenv file path
    pub fn dotenv_path(&self) -> PathBuf {
        self.config_dir.join(&self.dotenv_file)
    }

    /// Resolve the configuration
    ///
    /// # Errors
    ///
    /// Returns the first error encountered:
    /// - [`ConfigError::InvalidEnvironment`] if the environment name cannot name a file
    /// - [`ConfigError::Load`] if either configuration file is missing or unparseable
    /// - [`ConfigError::Decode`] if a recognised key has the wrong type
    /// - [`ConfigError::EnvOverlay`] if the dotenv file exists but is unreadable
    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        let tree = self.merged_tree()?;
        let mut settings = Settings::from_tree(&tree)?;

        overlay::load_dotenv(&self.dotenv_path())?;
        Secrets::from_process_env().apply(&mut settings);

        tracing::info!(
            config_dir = %self.config_dir.display(),
            environment = %self.environment,
            "Configuration resolved"
        );
        Ok(settings)
    }

    /// Load both layers, merge them and seed defaults
    ///
    /// This is everything [`Resolver::resolve`] does before decoding.
    pub fn merged_tree(&self) -> Result<ConfigTree, ConfigError> {
        let environment = validate_environment_name(&self.environment)?;

        let mut tree = ConfigTree::from_file(&self.config_dir.join(BASE_CONFIG_NAME))?;
        let env_tree = ConfigTree::from_file(&self.config_dir.join(environment))?;
        tree.merge(env_tree);
        seed_defaults(&mut tree);

        Ok(tree)
    }
}

/// Check that `name` can name an environment file, returning it trimmed
///
/// The trimmed name must be non-empty, contain no path separator and not start
/// with `.`, so it always names a sibling of `main.<ext>`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvironment`] describing the first rule broken.
pub fn validate_environment_name(name: &str) -> Result<&str, ConfigError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid_environment(
            "environment name cannot be empty",
        ));
    }
    if trimmed.contains(['/', '\\']) {
        return Err(ConfigError::invalid_environment(format!(
            "'{name}' must be a file name, not a path"
        )));
    }
    if trimmed.starts_with('.') {
        return Err(ConfigError::invalid_environment(format!(
            "'{name}' cannot start with '.'"
        )));
    }
    Ok(trimmed)
}

/// Resolve configuration from `config_dir` for `environment`
///
/// Shorthand for `Resolver::new(config_dir, environment).resolve()`.
pub fn resolve(
    config_dir: impl Into<PathBuf>,
    environment: impl Into<String>,
) -> Result<Settings, ConfigError> {
    Resolver::new(config_dir, environment).resolve()
}
