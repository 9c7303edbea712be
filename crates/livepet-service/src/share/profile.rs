//! Loads the filtered, read-only health profile a grant discloses.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use livepet_core::config::share::ShareConfig;
use livepet_core::error::AppError;
use livepet_core::result::AppResult;
use livepet_core::types::ShareId;
use livepet_database::HealthStore;
use livepet_entity::health::{Alert, Document, HealthRecord, Vital};
use livepet_entity::pet::PetProfile;
use livepet_entity::share::ShareGrant;

/// Grant details shown alongside the profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantMetadata {
    /// Hard expiry of the grant.
    pub expires_at: DateTime<Utc>,
    /// Recipient display name.
    pub recipient_name: Option<String>,
    /// Personal note from the owner.
    pub message: Option<String>,
}

/// What a recipient sees. Disabled categories are `None` and are left out of
/// the serialized output; enabled categories without data are empty lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedProfile {
    /// Pet identity, always present.
    pub pet: PetProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_records: Option<Vec<HealthRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vitals: Option<Vec<Vital>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<Alert>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<Document>>,
    /// Grant metadata.
    pub share: GrantMetadata,
}

/// Reads a grant's pet and enabled categories from the health store.
#[derive(Clone)]
pub struct ProfileLoader {
    health: Arc<dyn HealthStore>,
    record_limit: u32,
    vital_limit: u32,
    alert_limit: Option<u32>,
    document_limit: u32,
}

impl std::fmt::Debug for ProfileLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileLoader")
            .field("record_limit", &self.record_limit)
            .field("vital_limit", &self.vital_limit)
            .field("alert_limit", &self.alert_limit)
            .field("document_limit", &self.document_limit)
            .finish_non_exhaustive()
    }
}

impl ProfileLoader {
    /// Creates a loader with limits from the share configuration.
    pub fn new(health: Arc<dyn HealthStore>, config: &ShareConfig) -> Self {
        Self {
            health,
            record_limit: config.record_limit,
            vital_limit: config.vital_limit,
            alert_limit: config.alert_limit,
            document_limit: config.document_limit,
        }
    }

    /// Load the profile for a grant that has already passed every gate.
    ///
    /// A missing or unreadable pet fails the whole load. A category whose
    /// read fails is omitted and the rest of the profile is still returned.
    pub async fn load_profile(&self, grant: &ShareGrant) -> AppResult<SharedProfile> {
        let pet = match self.health.find_pet(grant.pet_id).await {
            Ok(Some(pet)) => pet,
            Ok(None) => {
                error!(share_id = %grant.id, pet_id = %grant.pet_id, "Shared pet no longer exists");
                return Err(AppError::internal("Unable to load shared profile"));
            }
            Err(e) => {
                error!(share_id = %grant.id, pet_id = %grant.pet_id, error = %e, "Failed to load shared pet");
                return Err(AppError::internal("Unable to load shared profile"));
            }
        };

        let pet_id = grant.pet_id;
        let visibility = grant.visibility;
        let (health_records, vitals, alerts, documents) = tokio::join!(
            read_category(
                grant.id,
                "health_records",
                visibility.allow_health_records,
                self.health.recent_records(pet_id, self.record_limit),
            ),
            read_category(
                grant.id,
                "vitals",
                visibility.allow_vitals,
                self.health.recent_vitals(pet_id, self.vital_limit),
            ),
            read_category(
                grant.id,
                "alerts",
                visibility.allow_alerts,
                self.health.active_alerts(pet_id, self.alert_limit),
            ),
            read_category(
                grant.id,
                "documents",
                visibility.allow_documents,
                self.health.recent_documents(pet_id, self.document_limit),
            ),
        );

        Ok(SharedProfile {
            pet,
            health_records,
            vitals,
            alerts,
            documents,
            share: GrantMetadata {
                expires_at: grant.expires_at,
                recipient_name: grant.recipient_name.clone(),
                message: grant.message.clone(),
            },
        })
    }
}

/// The read future is only polled when the category is enabled.
async fn read_category<T>(
    share_id: ShareId,
    category: &'static str,
    enabled: bool,
    read: impl Future<Output = AppResult<Vec<T>>>,
) -> Option<Vec<T>> {
    if !enabled {
        return None;
    }
    match read.await {
        Ok(rows) => Some(rows),
        Err(e) => {
            warn!(share_id = %share_id, category, error = %e, "Omitting unreadable category from shared profile");
            None
        }
    }
}
