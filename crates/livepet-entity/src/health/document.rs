//! Uploaded health documents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use livepet_core::types::{DocumentId, PetId};

/// Metadata for a stored document (lab results, certificates).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: DocumentId,
    pub pet_id: PetId,
    pub title: String,
    pub document_type: String,
    pub file_url: String,
    pub document_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}
