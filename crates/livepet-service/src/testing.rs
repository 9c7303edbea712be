//! Shared fixtures for service unit tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;

use livepet_core::config::share::ShareConfig;
use livepet_core::error::AppError;
use livepet_core::result::AppResult;
use livepet_core::types::{
    AlertId, DocumentId, HealthRecordId, PetId, UserId, VitalId,
};
use livepet_database::{HealthStore, MemoryStore};
use livepet_entity::health::{
    Alert, AlertStatus, Document, HealthRecord, NewHealthRecord, Vital,
};
use livepet_entity::pet::PetProfile;

use crate::context::{ClientInfo, RequestContext};
use crate::notification::{NotificationRelay, ShareEmail};
use crate::share::{AccessService, ProfileLoader, ShareService};

/// Relay that remembers what it was asked to send.
#[derive(Debug, Default)]
pub struct RecordingRelay {
    pub sent: Mutex<Vec<ShareEmail>>,
    pub fail: bool,
}

#[async_trait]
impl NotificationRelay for RecordingRelay {
    async fn send_share_email(&self, email: &ShareEmail) -> AppResult<()> {
        if self.fail {
            return Err(AppError::external_service("relay down"));
        }
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}

/// Health store whose vitals and timeline writes always fail.
#[derive(Debug, Clone)]
pub struct FlakyHealth(pub MemoryStore);

#[async_trait]
impl HealthStore for FlakyHealth {
    async fn find_pet(&self, pet_id: PetId) -> AppResult<Option<PetProfile>> {
        self.0.find_pet(pet_id).await
    }

    async fn find_owned_pet(&self, pet_id: PetId, owner: UserId) -> AppResult<Option<PetProfile>> {
        self.0.find_owned_pet(pet_id, owner).await
    }

    async fn recent_records(&self, pet_id: PetId, limit: u32) -> AppResult<Vec<HealthRecord>> {
        self.0.recent_records(pet_id, limit).await
    }

    async fn recent_vitals(&self, _pet_id: PetId, _limit: u32) -> AppResult<Vec<Vital>> {
        Err(AppError::database("vitals table unavailable"))
    }

    async fn active_alerts(&self, pet_id: PetId, limit: Option<u32>) -> AppResult<Vec<Alert>> {
        self.0.active_alerts(pet_id, limit).await
    }

    async fn recent_documents(&self, pet_id: PetId, limit: u32) -> AppResult<Vec<Document>> {
        self.0.recent_documents(pet_id, limit).await
    }

    async fn create_record(&self, _data: &NewHealthRecord) -> AppResult<HealthRecord> {
        Err(AppError::database("health_records is read-only"))
    }
}

/// Services wired to one in-memory store, with an owner and a pet.
pub struct Fixture {
    pub store: MemoryStore,
    pub relay: Arc<RecordingRelay>,
    pub shares: ShareService,
    pub access: AccessService,
    pub owner: RequestContext,
    pub pet: PetProfile,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::build(RecordingRelay::default(), false).await
    }

    pub async fn with_relay(relay: RecordingRelay) -> Self {
        Self::build(relay, false).await
    }

    /// Vitals reads and timeline writes fail.
    pub async fn with_flaky_health() -> Self {
        Self::build(RecordingRelay::default(), true).await
    }

    async fn build(relay: RecordingRelay, flaky: bool) -> Self {
        let store = MemoryStore::new();
        let owner = RequestContext::new(
            UserId::new(),
            "owner@example.com".to_string(),
            Some("127.0.0.1".to_string()),
            None,
        );
        let pet = PetProfile {
            id: PetId::new(),
            user_id: owner.user_id,
            name: "Biscuit".to_string(),
            species: "dog".to_string(),
            breed: Some("Beagle".to_string()),
            photo_url: None,
            birth_date: NaiveDate::from_ymd_opt(2020, 4, 12),
        };
        store.insert_pet(pet.clone()).await;

        let health: Arc<dyn HealthStore> = if flaky {
            Arc::new(FlakyHealth(store.clone()))
        } else {
            Arc::new(store.clone())
        };
        let relay = Arc::new(relay);
        let config = ShareConfig {
            public_origin: "https://livepet.test".to_string(),
            ..ShareConfig::default()
        };
        let shares = ShareService::new(
            Arc::new(store.clone()),
            health.clone(),
            relay.clone(),
            config.clone(),
            Duration::from_secs(2),
        );
        let access = AccessService::new(
            Arc::new(store.clone()),
            ProfileLoader::new(health, &config),
        );

        Self {
            store,
            relay,
            shares,
            access,
            owner,
            pet,
        }
    }

    pub async fn add_record(&self, title: &str, day: u32) {
        self.store
            .insert_record(HealthRecord {
                id: HealthRecordId::new(),
                pet_id: self.pet.id,
                user_id: self.owner.user_id,
                record_type: "vaccination".to_string(),
                title: title.to_string(),
                description: None,
                date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap_or_default(),
                notes: None,
                created_at: Utc::now(),
            })
            .await;
    }

    pub async fn add_vital(&self, value: f64) {
        self.store
            .insert_vital(Vital {
                id: VitalId::new(),
                pet_id: self.pet.id,
                vital_type: "weight".to_string(),
                value,
                unit: Some("kg".to_string()),
                measured_at: Utc::now(),
                notes: None,
            })
            .await;
    }

    pub async fn add_alert(&self, title: &str) {
        self.store
            .insert_alert(Alert {
                id: AlertId::new(),
                pet_id: self.pet.id,
                alert_type: "reminder".to_string(),
                title: title.to_string(),
                description: None,
                due_date: NaiveDate::from_ymd_opt(2026, 6, 1),
                status: AlertStatus::Active,
                created_at: Utc::now(),
            })
            .await;
    }

    pub async fn add_document(&self, title: &str) {
        self.store
            .insert_document(Document {
                id: DocumentId::new(),
                pet_id: self.pet.id,
                title: title.to_string(),
                document_type: "lab_result".to_string(),
                file_url: "https://files.livepet.test/doc.pdf".to_string(),
                document_date: NaiveDate::from_ymd_opt(2026, 2, 1),
                created_at: Utc::now(),
            })
            .await;
    }
}

pub fn recipient() -> ClientInfo {
    ClientInfo {
        ip_address: Some("203.0.113.7".to_string()),
        user_agent: Some("vet-portal/1.0".to_string()),
    }
}
