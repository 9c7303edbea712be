//! Pet identity, the part of a profile every grant discloses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use livepet_core::types::{PetId, UserId};

/// A pet row as seen by the share subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PetProfile {
    /// Pet identifier.
    pub id: PetId,
    /// Owning user. Not disclosed to recipients.
    #[serde(skip_serializing)]
    pub user_id: UserId,
    /// Pet name.
    pub name: String,
    /// Species, e.g. `dog`.
    pub species: String,
    /// Breed.
    pub breed: Option<String>,
    /// Photo URL.
    pub photo_url: Option<String>,
    /// Date of birth.
    pub birth_date: Option<NaiveDate>,
}
