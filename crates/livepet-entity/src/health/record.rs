//! Health timeline records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use livepet_core::types::{HealthRecordId, PetId, UserId};

/// Record type of the owner-only timeline entry written when a profile is
/// shared. Such entries are never disclosed through a share.
pub const SHARE_EVENT_RECORD_TYPE: &str = "share_event";

/// A dated entry on a pet's health timeline.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HealthRecord {
    pub id: HealthRecordId,
    pub pet_id: PetId,
    #[serde(skip_serializing)]
    pub user_id: UserId,
    /// Free-form kind, e.g. `vaccination`, `general`.
    pub record_type: String,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HealthRecord {
    /// Whether this is an issuance entry rather than health data.
    pub fn is_share_event(&self) -> bool {
        self.record_type == SHARE_EVENT_RECORD_TYPE
    }
}

/// Data required to append a health record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHealthRecord {
    pub pet_id: PetId,
    pub user_id: UserId,
    pub record_type: String,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub notes: Option<String>,
}
