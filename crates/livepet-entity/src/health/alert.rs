//! Health alerts and reminders.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use livepet_core::types::{AlertId, PetId};

/// Alert lifecycle. Only `Active` alerts are shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Active,
    Completed,
    Dismissed,
}

/// A reminder or warning attached to a pet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alert {
    pub id: AlertId,
    pub pet_id: PetId,
    pub alert_type: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
}
