//! Layerconf Library
//!
//! Layered configuration resolution for backend services: a base file, an
//! environment override, static defaults and secrets from the environment.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod logger;

pub use crate::config::{ConfigError, Resolver, Settings, resolve};

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
