//! Resolved configuration structures
//!
//! [`Settings`] is the typed result of resolution. It is decoded from a merged
//! [`ConfigTree`] through explicit key-path mappings rather than a blanket
//! structural deserialize, so keys outside the recognised set are ignored and
//! the first value that fails to convert aborts decoding.

use std::time::Duration;

use config::{Value, ValueKind};
use jiff::SignedDuration;
use serde::{Serialize, Serializer};

use crate::config::error::ConfigError;
use crate::config::tree::ConfigTree;

const REDACTED: &str = "********";

// ============================================================================
// Settings
// ============================================================================

/// Fully resolved configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Deployment environment name, taken from `APP_ENV`
    pub environment: String,

    /// HTTP listener configuration
    pub http: HttpConfig,

    /// Authentication configuration
    pub auth: AuthConfig,
}

impl Settings {
    /// Decode the recognised key paths of a merged tree
    ///
    /// The four environment-sourced fields (`environment`, `http.host`,
    /// `auth.password_salt`, `auth.jwt.secret_key`) are left empty here; the
    /// environment overlay fills them in.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Decode`] for the first key whose value cannot be
    /// converted to its field type.
    pub fn from_tree(tree: &ConfigTree) -> Result<Self, ConfigError> {
        // http
        let http = HttpConfig {
            host: String::new(),
            port: decode_string(tree, "http.port")?,
            read_timeout: decode_duration(tree, "http.read_timeout")?,
            write_timeout: decode_duration(tree, "http.write_timeout")?,
            max_header_size_mb: decode_u32(tree, "http.max_header_megabyte")?,
        };

        // auth
        let verification_code_length = decode_u32(tree, "auth.verification_code_length")?;

        // jwt
        let access_token = TokenConfig {
            private_key: decode_string(tree, "jwt.access_token.private_key")?,
            public_key: decode_string(tree, "jwt.access_token.public_key")?,
            max_age: decode_duration(tree, "jwt.access_token.max_age")?,
        };
        let refresh_token = TokenConfig {
            private_key: decode_string(tree, "jwt.refresh_token.private_key")?,
            public_key: decode_string(tree, "jwt.refresh_token.public_key")?,
            max_age: decode_duration(tree, "jwt.refresh_token.max_age")?,
        };

        Ok(Self {
            environment: String::new(),
            http,
            auth: AuthConfig {
                password_salt: String::new(),
                verification_code_length,
                jwt: JwtConfig {
                    secret_key: String::new(),
                    access_token,
                    refresh_token,
                },
            },
        })
    }

    /// Copy of these settings with secret material masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        redact(&mut copy.auth.password_salt);
        redact(&mut copy.auth.jwt.secret_key);
        redact(&mut copy.auth.jwt.access_token.private_key);
        redact(&mut copy.auth.jwt.refresh_token.private_key);
        copy
    }
}

fn redact(field: &mut String) {
    if !field.is_empty() {
        *field = REDACTED.to_string();
    }
}

// ============================================================================
// HTTP Configuration
// ============================================================================

/// HTTP listener configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HttpConfig {
    /// Bind host, taken from `HTTP_HOST`
    pub host: String,

    /// Listen port, kept as text the way it appears in configuration
    pub port: String,

    #[serde(serialize_with = "serialize_duration")]
    pub read_timeout: Duration,

    #[serde(serialize_with = "serialize_duration")]
    pub write_timeout: Duration,

    /// Maximum request header size in megabytes
    pub max_header_size_mb: u32,
}

impl HttpConfig {
    /// Get the full listen address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Maximum request header size in bytes
    pub fn max_header_bytes(&self) -> u64 {
        u64::from(self.max_header_size_mb) << 20
    }
}

// ============================================================================
// Auth Configuration
// ============================================================================

/// Authentication configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthConfig {
    /// Password hashing salt, taken from `PASSWORD_SALT`
    pub password_salt: String,

    /// Number of characters in generated verification codes
    pub verification_code_length: u32,

    pub jwt: JwtConfig,
}

/// JWT signing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JwtConfig {
    /// Shared signing secret, taken from `JWT_SECRET_KEY`
    /// and never from configuration files
    pub secret_key: String,

    pub access_token: TokenConfig,

    pub refresh_token: TokenConfig,
}

/// Key pair and lifetime for one kind of token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenConfig {
    pub private_key: String,

    pub public_key: String,

    #[serde(serialize_with = "serialize_duration")]
    pub max_age: Duration,
}

// ============================================================================
// Field decoding
// ============================================================================

/// Value at `key`, treating an explicit null like a missing key
fn lookup<'a>(tree: &'a ConfigTree, key: &str) -> Option<&'a Value> {
    tree.get(key)
        .filter(|value| !matches!(value.kind, ValueKind::Nil))
}

fn decode_string(tree: &ConfigTree, key: &str) -> Result<String, ConfigError> {
    match lookup(tree, key) {
        Some(value) => value
            .clone()
            .into_string()
            .map_err(|e| ConfigError::decode(key, e.to_string())),
        None => Ok(String::new()),
    }
}

fn decode_u32(tree: &ConfigTree, key: &str) -> Result<u32, ConfigError> {
    let Some(value) = lookup(tree, key) else {
        return Ok(0);
    };
    if let ValueKind::Float(number) = value.kind {
        if number.fract() != 0.0 {
            return Err(ConfigError::decode(
                key,
                format!("expected a whole number, found {number}"),
            ));
        }
    }
    let number = value
        .clone()
        .into_int()
        .map_err(|e| ConfigError::decode(key, e.to_string()))?;
    u32::try_from(number).map_err(|_| {
        ConfigError::decode(
            key,
            format!("expected a non-negative integer below 2^32, found {number}"),
        )
    })
}

fn decode_duration(tree: &ConfigTree, key: &str) -> Result<Duration, ConfigError> {
    let Some(value) = lookup(tree, key) else {
        return Ok(Duration::ZERO);
    };
    match &value.kind {
        ValueKind::I64(secs) => u64::try_from(*secs)
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::decode(key, format!("duration must not be negative, found {secs}"))),
        ValueKind::U64(secs) => Ok(Duration::from_secs(*secs)),
        ValueKind::String(text) => parse_duration(text).map_err(|message| ConfigError::decode(key, message)),
        other => Err(ConfigError::decode(
            key,
            format!("expected a duration such as \"10s\" or a number of seconds, found {other}"),
        )),
    }
}

/// Parse a duration written as `"20s"`, `"1h 30m"` or ISO 8601 (`"PT20S"`)
pub fn parse_duration(text: &str) -> Result<Duration, String> {
    let signed = text
        .trim()
        .parse::<SignedDuration>()
        .map_err(|e| format!("invalid duration '{text}': {e}"))?;
    Duration::try_from(signed).map_err(|_| format!("duration must not be negative, found '{text}'"))
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    match SignedDuration::try_from(*duration) {
        Ok(signed) => serializer.collect_str(&format_args!("{signed:#}")),
        Err(_) => serializer.collect_str(&format_args!("{}s", duration.as_secs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_from_toml(text: &str) -> ConfigTree {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("layer.toml"), text).expect("Failed to write config file");
        ConfigTree::from_file(&dir.path().join("layer")).expect("Should load tree")
    }

    #[test]
    fn test_from_tree_decodes_all_recognised_keys() {
        let tree = tree_from_toml(
            r#"
[http]
port = 4051
read_timeout = "20s"
write_timeout = 30
max_header_megabyte = 10

[auth]
verification_code_length = 150

[jwt.access_token]
private_key = "test-2"
public_key = "test-3"
max_age = "15m"

[jwt.refresh_token]
private_key = "test-2"
public_key = "test-3"
max_age = "PT1H"
"#,
        );

        let settings = Settings::from_tree(&tree).expect("Should decode");

        assert_eq!(settings.http.port, "4051");
        assert_eq!(settings.http.read_timeout, Duration::from_secs(20));
        assert_eq!(settings.http.write_timeout, Duration::from_secs(30));
        assert_eq!(settings.http.max_header_size_mb, 10);
        assert_eq!(settings.auth.verification_code_length, 150);
        assert_eq!(settings.auth.jwt.access_token.private_key, "test-2");
        assert_eq!(settings.auth.jwt.access_token.public_key, "test-3");
        assert_eq!(settings.auth.jwt.access_token.max_age, Duration::from_secs(15 * 60));
        assert_eq!(settings.auth.jwt.refresh_token.max_age, Duration::from_secs(60 * 60));
    }

    #[test]
    fn test_from_tree_leaves_env_fields_empty() {
        let tree = tree_from_toml("[http]\nhost = \"from-file\"\n");
        let settings = Settings::from_tree(&tree).expect("Should decode");

        assert_eq!(settings.http.host, "");
        assert_eq!(settings.environment, "");
        assert_eq!(settings.auth.password_salt, "");
        assert_eq!(settings.auth.jwt.secret_key, "");
    }

    #[test]
    fn test_from_tree_missing_keys_are_empty() {
        let settings = Settings::from_tree(&ConfigTree::new()).expect("Should decode");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_from_tree_rejects_non_numeric_header_size() {
        let tree = tree_from_toml("[http]\nmax_header_megabyte = \"lots\"\n");
        let err = Settings::from_tree(&tree).expect_err("Should fail");

        match err {
            ConfigError::Decode { key, .. } => assert_eq!(key, "http.max_header_megabyte"),
            other => panic!("Expected Decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_tree_rejects_fractional_header_size() {
        let tree = tree_from_toml("[http]\nmax_header_megabyte = 1.5\n");
        let err = Settings::from_tree(&tree).expect_err("Should fail");
        assert!(matches!(err, ConfigError::Decode { ref key, .. } if key == "http.max_header_megabyte"));

        let tree = tree_from_toml("[http]\nmax_header_megabyte = 2.0\n");
        let settings = Settings::from_tree(&tree).expect("Should decode");
        assert_eq!(settings.http.max_header_size_mb, 2);
    }

    #[test]
    fn test_from_tree_rejects_table_for_string() {
        let tree = tree_from_toml("[http.port]\nnumber = 1\n");
        let err = Settings::from_tree(&tree).expect_err("Should fail");
        assert!(matches!(err, ConfigError::Decode { ref key, .. } if key == "http.port"));
    }

    #[test]
    fn test_from_tree_rejects_negative_values() {
        let tree = tree_from_toml("[auth]\nverification_code_length = -1\n");
        assert!(Settings::from_tree(&tree).is_err());

        let tree = tree_from_toml("[http]\nread_timeout = -5\n");
        assert!(Settings::from_tree(&tree).is_err());
    }

    #[test]
    fn test_from_tree_stops_at_first_bad_key() {
        let tree = tree_from_toml("[http]\nread_timeout = \"soon\"\nwrite_timeout = \"later\"\n");
        let err = Settings::from_tree(&tree).expect_err("Should fail");
        assert!(matches!(err, ConfigError::Decode { ref key, .. } if key == "http.read_timeout"));
    }

    #[test]
    fn test_parse_duration_formats() {
        assert_eq!(parse_duration("10s"), Ok(Duration::from_secs(10)));
        assert_eq!(parse_duration("1h 30m"), Ok(Duration::from_secs(90 * 60)));
        assert_eq!(parse_duration("PT15M"), Ok(Duration::from_secs(15 * 60)));
        assert!(parse_duration("ten seconds").is_err());
        assert!(parse_duration("-10s").is_err());
    }

    #[test]
    fn test_redacted_masks_secrets_only() {
        let mut settings = Settings::default();
        settings.auth.password_salt = "salt".into();
        settings.auth.jwt.secret_key = "secret".into();
        settings.auth.jwt.access_token.private_key = "private".into();
        settings.auth.jwt.access_token.public_key = "public".into();

        let redacted = settings.redacted();
        assert_eq!(redacted.auth.password_salt, REDACTED);
        assert_eq!(redacted.auth.jwt.secret_key, REDACTED);
        assert_eq!(redacted.auth.jwt.access_token.private_key, REDACTED);
        assert_eq!(redacted.auth.jwt.access_token.public_key, "public");
        assert_eq!(redacted.auth.jwt.refresh_token.private_key, "");
    }

    #[test]
    fn test_serialized_durations_are_readable() {
        let mut settings = Settings::default();
        settings.http.read_timeout = Duration::from_secs(20);

        let json = serde_json::to_value(&settings).expect("Should serialize");
        let text = json["http"]["read_timeout"].as_str().expect("duration is a string");
        assert_eq!(parse_duration(text), Ok(Duration::from_secs(20)));
    }

    #[test]
    fn test_http_address_and_header_bytes() {
        let http = HttpConfig {
            host: "local.test".into(),
            port: "4051".into(),
            max_header_size_mb: 2,
            ..HttpConfig::default()
        };
        assert_eq!(http.address(), "local.test:4051");
        assert_eq!(http.max_header_bytes(), 2 * 1024 * 1024);
    }
}
