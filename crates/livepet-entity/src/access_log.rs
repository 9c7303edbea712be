//! Share access log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use livepet_core::types::{AccessLogId, ShareId};

/// Section name recorded for a profile view attempt.
pub const SUMMARY_SECTION: &str = "summary";

/// An append-only record of one verification attempt against a grant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccessLogEntry {
    /// Unique entry identifier.
    pub id: AccessLogId,
    /// The grant that was accessed.
    pub share_id: ShareId,
    /// Which part of the profile was requested.
    pub viewed_section: String,
    /// Whether the attempt was granted.
    pub success: bool,
    /// Client address, when known.
    pub ip_address: Option<String>,
    /// Client user agent, when known.
    pub user_agent: Option<String>,
    /// When the attempt happened.
    pub accessed_at: DateTime<Utc>,
}

/// Data required to append an access log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccessLogEntry {
    /// The grant that was accessed.
    pub share_id: ShareId,
    /// Which part of the profile was requested.
    pub viewed_section: String,
    /// Whether the attempt was granted.
    pub success: bool,
    /// Client address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// When the attempt happened.
    pub accessed_at: DateTime<Utc>,
}

impl NewAccessLogEntry {
    /// Attach an identifier, producing the stored row.
    pub fn into_entry(self, id: AccessLogId) -> AccessLogEntry {
        AccessLogEntry {
            id,
            share_id: self.share_id,
            viewed_section: self.viewed_section,
            success: self.success,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            accessed_at: self.accessed_at,
        }
    }
}
