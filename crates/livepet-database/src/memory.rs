//! In-memory store using a Tokio mutex, for development and tests.
//!
//! Every operation takes the single state lock, so the check-and-increment
//! in [`ShareStore::consume_view`] is atomic with respect to all other
//! store calls.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use livepet_core::result::AppResult;
use livepet_core::types::{
    AccessLogId, HealthRecordId, PageRequest, PageResponse, PetId, ShareId, UserId,
};
use livepet_entity::access_log::{AccessLogEntry, NewAccessLogEntry};
use livepet_entity::health::{Alert, AlertStatus, Document, HealthRecord, NewHealthRecord, Vital};
use livepet_entity::pet::PetProfile;
use livepet_entity::share::{NewShareGrant, ShareGrant, ShareStatus};

use crate::store::{HealthStore, ShareStore};

#[derive(Debug, Default)]
struct InnerState {
    shares: HashMap<ShareId, ShareGrant>,
    access_logs: Vec<AccessLogEntry>,
    pets: HashMap<PetId, PetProfile>,
    records: Vec<HealthRecord>,
    vitals: Vec<Vital>,
    alerts: Vec<Alert>,
    documents: Vec<Document>,
}

/// Process-local implementation of both store traits.
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a pet.
    pub async fn insert_pet(&self, pet: PetProfile) {
        self.state.lock().await.pets.insert(pet.id, pet);
    }

    /// Insert a health record as-is.
    pub async fn insert_record(&self, record: HealthRecord) {
        self.state.lock().await.records.push(record);
    }

    /// Insert a vital measurement.
    pub async fn insert_vital(&self, vital: Vital) {
        self.state.lock().await.vitals.push(vital);
    }

    /// Insert an alert.
    pub async fn insert_alert(&self, alert: Alert) {
        self.state.lock().await.alerts.push(alert);
    }

    /// Insert a document.
    pub async fn insert_document(&self, document: Document) {
        self.state.lock().await.documents.push(document);
    }

    /// Replace a stored grant wholesale.
    pub async fn put_share(&self, share: ShareGrant) {
        self.state.lock().await.shares.insert(share.id, share);
    }

    /// Every health record stored for a pet, in insertion order.
    pub async fn records_for(&self, pet_id: PetId) -> Vec<HealthRecord> {
        self.state
            .lock()
            .await
            .records
            .iter()
            .filter(|r| r.pet_id == pet_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ShareStore for MemoryStore {
    async fn create_share(&self, data: &NewShareGrant) -> AppResult<ShareGrant> {
        let grant = data.clone().into_grant(ShareId::new());
        let mut state = self.state.lock().await;
        state.shares.insert(grant.id, grant.clone());
        debug!(share_id = %grant.id, "Stored share in memory");
        Ok(grant)
    }

    async fn find_share_by_id(&self, id: ShareId) -> AppResult<Option<ShareGrant>> {
        Ok(self.state.lock().await.shares.get(&id).cloned())
    }

    async fn find_share_by_token(&self, token: &str) -> AppResult<Option<ShareGrant>> {
        let state = self.state.lock().await;
        Ok(state
            .shares
            .values()
            .find(|s| s.share_token == token)
            .cloned())
    }

    async fn list_shares_by_owner(
        &self,
        owner: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareGrant>> {
        let state = self.state.lock().await;
        let mut owned: Vec<ShareGrant> = state
            .shares
            .values()
            .filter(|s| s.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by_key(|s| Reverse((s.created_at, s.id.into_uuid())));
        let total = owned.len() as u64;
        let items = owned
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn consume_view(
        &self,
        id: ShareId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ShareGrant>> {
        let mut state = self.state.lock().await;
        let Some(share) = state.shares.get_mut(&id) else {
            return Ok(None);
        };
        let eligible = share.status == ShareStatus::Active
            && !share.is_expired_at(now)
            && !share.view_limit_reached();
        if !eligible {
            return Ok(None);
        }
        share.views_count += 1;
        share.last_accessed_at = Some(now);
        Ok(Some(share.clone()))
    }

    async fn revoke_share(
        &self,
        id: ShareId,
        owner: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ShareGrant>> {
        let mut state = self.state.lock().await;
        let Some(share) = state.shares.get_mut(&id).filter(|s| s.user_id == owner) else {
            return Ok(None);
        };
        if share.status == ShareStatus::Active {
            share.status = ShareStatus::Revoked;
            share.revoked_at = Some(now);
        }
        Ok(Some(share.clone()))
    }

    async fn append_access_log(&self, entry: &NewAccessLogEntry) -> AppResult<AccessLogEntry> {
        let stored = entry.clone().into_entry(AccessLogId::new());
        self.state.lock().await.access_logs.push(stored.clone());
        Ok(stored)
    }

    async fn list_access_logs(&self, share_id: ShareId) -> AppResult<Vec<AccessLogEntry>> {
        let state = self.state.lock().await;
        let mut logs: Vec<AccessLogEntry> = state
            .access_logs
            .iter()
            .filter(|l| l.share_id == share_id)
            .cloned()
            .collect();
        logs.sort_by_key(|l| Reverse(l.accessed_at));
        Ok(logs)
    }
}

#[async_trait]
impl HealthStore for MemoryStore {
    async fn find_pet(&self, pet_id: PetId) -> AppResult<Option<PetProfile>> {
        Ok(self.state.lock().await.pets.get(&pet_id).cloned())
    }

    async fn find_owned_pet(&self, pet_id: PetId, owner: UserId) -> AppResult<Option<PetProfile>> {
        let state = self.state.lock().await;
        Ok(state
            .pets
            .get(&pet_id)
            .filter(|p| p.user_id == owner)
            .cloned())
    }

    async fn recent_records(&self, pet_id: PetId, limit: u32) -> AppResult<Vec<HealthRecord>> {
        let state = self.state.lock().await;
        let mut rows: Vec<HealthRecord> = state
            .records
            .iter()
            .filter(|r| r.pet_id == pet_id && !r.is_share_event())
            .cloned()
            .collect();
        rows.sort_by_key(|r| Reverse(r.date));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn recent_vitals(&self, pet_id: PetId, limit: u32) -> AppResult<Vec<Vital>> {
        let state = self.state.lock().await;
        let mut rows: Vec<Vital> = state
            .vitals
            .iter()
            .filter(|v| v.pet_id == pet_id)
            .cloned()
            .collect();
        rows.sort_by_key(|v| Reverse(v.measured_at));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn active_alerts(&self, pet_id: PetId, limit: Option<u32>) -> AppResult<Vec<Alert>> {
        let state = self.state.lock().await;
        let mut rows: Vec<Alert> = state
            .alerts
            .iter()
            .filter(|a| a.pet_id == pet_id && a.status == AlertStatus::Active)
            .cloned()
            .collect();
        // Undated alerts sort last.
        rows.sort_by_key(|a| (a.due_date.is_none(), a.due_date));
        if let Some(limit) = limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn recent_documents(&self, pet_id: PetId, limit: u32) -> AppResult<Vec<Document>> {
        let state = self.state.lock().await;
        let mut rows: Vec<Document> = state
            .documents
            .iter()
            .filter(|d| d.pet_id == pet_id)
            .cloned()
            .collect();
        rows.sort_by_key(|d| (d.document_date.is_none(), Reverse(d.document_date)));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn create_record(&self, data: &NewHealthRecord) -> AppResult<HealthRecord> {
        let record = HealthRecord {
            id: HealthRecordId::new(),
            pet_id: data.pet_id,
            user_id: data.user_id,
            record_type: data.record_type.clone(),
            title: data.title.clone(),
            description: data.description.clone(),
            date: data.date,
            notes: data.notes.clone(),
            created_at: Utc::now(),
        };
        self.state.lock().await.records.push(record.clone());
        Ok(record)
    }
}
