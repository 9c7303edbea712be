//! Vital sign measurements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use livepet_core::types::{PetId, VitalId};

/// One measurement, e.g. weight or heart rate.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vital {
    pub id: VitalId,
    pub pet_id: PetId,
    pub vital_type: String,
    pub value: f64,
    pub unit: Option<String>,
    pub measured_at: DateTime<Utc>,
    pub notes: Option<String>,
}
