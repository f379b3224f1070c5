//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token verification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to verify access tokens.
    pub jwt_secret: String,
    /// Clock-skew leeway for expiry checks, in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

fn default_leeway() -> u64 {
    5
}
