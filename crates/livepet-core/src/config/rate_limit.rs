//! Rate limiting configuration for the public share routes.

use serde::{Deserialize, Serialize};

/// Token bucket settings, applied per client address and, for code
/// verification, per share token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether throttling is applied at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Bucket capacity (burst size).
    #[serde(default = "default_burst")]
    pub burst: u32,
    /// Tokens added back per minute.
    #[serde(default = "default_per_minute")]
    pub requests_per_minute: u32,
    /// Code attempts allowed against one share token before throttling,
    /// whatever address they come from.
    #[serde(default = "default_code_attempts")]
    pub code_attempts_per_token: u32,
    /// Code attempts added back per minute for one share token.
    #[serde(default = "default_code_attempts_per_minute")]
    pub code_attempts_per_minute: u32,
    /// Key clients on the first `X-Forwarded-For` hop instead of the socket
    /// peer. Only safe behind a proxy that overwrites the header.
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            burst: default_burst(),
            requests_per_minute: default_per_minute(),
            code_attempts_per_token: default_code_attempts(),
            code_attempts_per_minute: default_code_attempts_per_minute(),
            trust_forwarded_for: false,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_burst() -> u32 {
    10
}

fn default_per_minute() -> u32 {
    30
}

fn default_code_attempts() -> u32 {
    10
}

fn default_code_attempts_per_minute() -> u32 {
    5
}
