//! Share issuance and gateway configuration.

use serde::{Deserialize, Serialize};

/// Settings for issuing grants and serving shared profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Origin the recipient opens, e.g. `https://livepet.app`.
    /// Share URLs are `{public_origin}/shared/health/{token}`.
    #[serde(default = "default_public_origin")]
    pub public_origin: String,
    /// When false every denial is reported to recipients as one generic
    /// "no longer valid" outcome.
    #[serde(default)]
    pub disclose_denial_reason: bool,
    /// Number of health records shown, newest first.
    #[serde(default = "default_record_limit")]
    pub record_limit: u32,
    /// Number of vitals shown, newest first.
    #[serde(default = "default_vital_limit")]
    pub vital_limit: u32,
    /// Number of active alerts shown. `None` shows all of them.
    #[serde(default)]
    pub alert_limit: Option<u32>,
    /// Number of documents shown, newest first.
    #[serde(default = "default_document_limit")]
    pub document_limit: u32,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            public_origin: default_public_origin(),
            disclose_denial_reason: false,
            record_limit: default_record_limit(),
            vital_limit: default_vital_limit(),
            alert_limit: None,
            document_limit: default_document_limit(),
        }
    }
}

impl ShareConfig {
    /// Build the recipient-facing URL for a token.
    pub fn share_url(&self, token: &str) -> String {
        format!("{}/shared/health/{token}", self.public_origin)
    }
}

fn default_public_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_record_limit() -> u32 {
    20
}

fn default_vital_limit() -> u32 {
    30
}

fn default_document_limit() -> u32 {
    20
}
