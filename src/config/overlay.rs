//! Secrets overlaid from the process environment
//!
//! A dotenv file next to the configuration files is loaded into the process
//! environment first; the four secret fields are then read from the
//! environment and written over whatever file-based decoding produced.

use std::io;
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Default dotenv file name inside the configuration directory
pub const DOTENV_FILE: &str = ".env";

/// Environment variable holding the password hashing salt
pub const PASSWORD_SALT_VAR: &str = "PASSWORD_SALT";

/// Environment variable holding the JWT signing secret
pub const JWT_SECRET_KEY_VAR: &str = "JWT_SECRET_KEY";

/// Environment variable holding the HTTP bind host
pub const HTTP_HOST_VAR: &str = "HTTP_HOST";

/// Environment variable holding the deployment environment name
pub const APP_ENV_VAR: &str = "APP_ENV";

/// Load `path` into the process environment if it exists
///
/// The whole file is parsed before anything is set, so a malformed file leaves
/// the environment untouched. Variables already present in the environment keep
/// their values. Returns whether a file was loaded.
///
/// # Errors
///
/// Returns [`ConfigError::EnvOverlay`] if the file exists but cannot be read or
/// contains a malformed line.
pub fn load_dotenv(path: &Path) -> Result<bool, ConfigError> {
    let pairs = match read_dotenv(path) {
        Ok(pairs) => pairs,
        Err(dotenvy::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "No dotenv file found, using process environment only");
            return Ok(false);
        }
        Err(e) => return Err(ConfigError::env_overlay(path, e.to_string())),
    };

    let mut applied = 0usize;
    for (key, value) in pairs {
        if std::env::var_os(&key).is_none() {
            // SAFETY: resolution runs before the caller spawns threads that
            // read the environment.
            unsafe { std::env::set_var(&key, value) };
            applied += 1;
        }
    }

    tracing::debug!(path = %path.display(), applied, "Loaded dotenv file");
    Ok(true)
}

fn read_dotenv(path: &Path) -> Result<Vec<(String, String)>, dotenvy::Error> {
    dotenvy::from_path_iter(path)?.collect()
}

/// Secret values captured from the process environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    pub password_salt: String,
    pub jwt_secret_key: String,
    pub http_host: String,
    pub app_env: String,
}

impl Secrets {
    /// Read the four secret variables; unset or non-UTF-8 variables read as empty
    pub fn from_process_env() -> Self {
        Self {
            password_salt: env_or_empty(PASSWORD_SALT_VAR),
            jwt_secret_key: env_or_empty(JWT_SECRET_KEY_VAR),
            http_host: env_or_empty(HTTP_HOST_VAR),
            app_env: env_or_empty(APP_ENV_VAR),
        }
    }

    /// Overwrite the secret fields of `settings`, whatever they held before
    pub fn apply(self, settings: &mut Settings) {
        settings.auth.password_salt = self.password_salt;
        settings.auth.jwt.secret_key = self.jwt_secret_key;
        settings.http.host = self.http_host;
        settings.environment = self.app_env;
    }
}

fn env_or_empty(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}
