//! Configuration error types

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while resolving configuration.
///
/// Every variant is fatal: resolution stops at the first error and no partial
/// result is returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file is missing, unreadable or fails to parse
    #[error("Failed to load configuration file '{}': {source}", .path.display())]
    Load {
        /// Path of the file, without its format extension
        path: PathBuf,
        /// Underlying error reported by the `config` crate
        #[source]
        source: config::ConfigError,
    },

    /// A key is present but its value cannot be converted to the target field
    #[error("Failed to decode '{key}': {message}")]
    Decode {
        /// Dotted key path that failed to decode
        key: String,
        /// What went wrong
        message: String,
    },

    /// The dotenv file exists but could not be read or parsed
    #[error("Failed to load environment overlay '{}': {message}", .path.display())]
    EnvOverlay {
        /// Path of the dotenv file
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// The environment name cannot name a configuration file
    #[error("Invalid environment name: {0}")]
    InvalidEnvironment(String),
}

impl ConfigError {
    /// Create a new load error
    pub fn load<P: Into<PathBuf>>(path: P, source: config::ConfigError) -> Self {
        ConfigError::Load {
            path: path.into(),
            source,
        }
    }

    /// Create a new decode error
    pub fn decode<K: Into<String>, M: Into<String>>(key: K, message: M) -> Self {
        ConfigError::Decode {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a new environment overlay error
    pub fn env_overlay<M: Into<String>>(path: &Path, message: M) -> Self {
        ConfigError::EnvOverlay {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a new invalid environment error
    pub fn invalid_environment<S: Into<String>>(message: S) -> Self {
        ConfigError::InvalidEnvironment(message.into())
    }
}
