//! Static defaults for keys neither configuration file sets

use std::time::Duration;

use crate::config::tree::ConfigTree;

pub const DEFAULT_HTTP_PORT: &str = "8000";
pub const DEFAULT_HTTP_RW_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_HTTP_MAX_HEADER_MEGABYTES: u32 = 1;
pub const DEFAULT_VERIFICATION_CODE_LENGTH: u32 = 8;
pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(15 * 60 * 60);
pub const DEFAULT_REFRESH_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Seed every default into `tree` where the merged layers left the key unset
///
/// This runs after the base and environment trees are merged, so an explicit
/// empty or zero value from either file wins over the default.
pub fn seed_defaults(tree: &mut ConfigTree) {
    let seeded = [
        tree.seed_default("http.port", DEFAULT_HTTP_PORT),
        tree.seed_default("http.read_timeout", seconds(DEFAULT_HTTP_RW_TIMEOUT)),
        tree.seed_default("http.write_timeout", seconds(DEFAULT_HTTP_RW_TIMEOUT)),
        tree.seed_default(
            "http.max_header_megabyte",
            i64::from(DEFAULT_HTTP_MAX_HEADER_MEGABYTES),
        ),
        tree.seed_default(
            "auth.verification_code_length",
            i64::from(DEFAULT_VERIFICATION_CODE_LENGTH),
        ),
        tree.seed_default("jwt.access_token.max_age", seconds(DEFAULT_ACCESS_TOKEN_TTL)),
        tree.seed_default("jwt.refresh_token.max_age", seconds(DEFAULT_REFRESH_TOKEN_TTL)),
    ];

    tracing::debug!(
        count = seeded.iter().filter(|applied| **applied).count(),
        "Seeded configuration defaults"
    );
}

// Duration defaults are stored as whole seconds, which the decoder reads back
fn seconds(duration: Duration) -> i64 {
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
}
