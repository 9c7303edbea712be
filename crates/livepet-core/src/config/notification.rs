//! Outbound email relay configuration.

use serde::{Deserialize, Serialize};

/// How share emails leave the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayProvider {
    /// POST to a Resend-compatible HTTP API.
    Http,
    /// Write the rendered email to the log only.
    #[default]
    Log,
    /// Never send; issuance reports `email_sent = false`.
    Disabled,
}

/// Notification relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Relay implementation.
    #[serde(default)]
    pub provider: RelayProvider,
    /// Email API endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer key for the email API.
    #[serde(default)]
    pub api_key: String,
    /// `From` header.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Upper bound on a single relay call.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            provider: RelayProvider::default(),
            api_url: default_api_url(),
            api_key: String::new(),
            from_address: default_from_address(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_from_address() -> String {
    "Livepet <noreply@livepet.app>".to_string()
}

fn default_timeout() -> u64 {
    10
}
