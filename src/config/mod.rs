//! Configuration resolution for layerconf
//!
//! This module resolves a typed [`Settings`] value from:
//! - A base `main.<ext>` file (TOML, YAML or JSON)
//! - An environment-specific `{environment}.<ext>` file
//! - Static defaults for keys neither file sets
//! - Secrets from the process environment and an optional `.env` file
//!
//! # Configuration Priority (lowest to highest)
//! 1. Defaults
//! 2. `main.<ext>`
//! 3. `{environment}.<ext>`
//! 4. `PASSWORD_SALT`, `JWT_SECRET_KEY`, `HTTP_HOST`, `APP_ENV`

pub mod defaults;
pub mod error;
pub mod overlay;
pub mod resolver;
pub mod settings;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export public types
pub use error::ConfigError;
pub use resolver::{Resolver, resolve, validate_environment_name};
pub use settings::{AuthConfig, HttpConfig, JwtConfig, Settings, TokenConfig};
pub use tree::ConfigTree;
