//! Store seams used by the share services.
//!
//! Both traits have a PostgreSQL implementation (`repositories`) and an
//! in-memory one (`memory`). Implementations must make
//! [`ShareStore::consume_view`] atomic: two concurrent calls against a grant
//! with one view left may not both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use livepet_core::result::AppResult;
use livepet_core::types::{PageRequest, PageResponse, PetId, ShareId, UserId};
use livepet_entity::access_log::{AccessLogEntry, NewAccessLogEntry};
use livepet_entity::health::{Alert, Document, HealthRecord, NewHealthRecord, Vital};
use livepet_entity::pet::PetProfile;
use livepet_entity::share::{NewShareGrant, ShareGrant};

/// Persistence for share grants and their access log.
#[async_trait]
pub trait ShareStore: Send + Sync + 'static {
    /// Persist a new grant. It starts active with zero views.
    async fn create_share(&self, data: &NewShareGrant) -> AppResult<ShareGrant>;

    /// Find a grant by internal id.
    async fn find_share_by_id(&self, id: ShareId) -> AppResult<Option<ShareGrant>>;

    /// Find a grant by its URL token.
    async fn find_share_by_token(&self, token: &str) -> AppResult<Option<ShareGrant>>;

    /// List an owner's grants, newest first.
    async fn list_shares_by_owner(
        &self,
        owner: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareGrant>>;

    /// Count one view if, at `now`, the grant is active, unexpired and
    /// below its cap. Also stamps `last_accessed_at`.
    ///
    /// Returns the updated grant, or `None` when no view was consumed.
    async fn consume_view(&self, id: ShareId, now: DateTime<Utc>)
    -> AppResult<Option<ShareGrant>>;

    /// Revoke a grant owned by `owner`.
    ///
    /// Returns `None` when no such grant belongs to `owner`. An already
    /// revoked grant is returned unchanged.
    async fn revoke_share(
        &self,
        id: ShareId,
        owner: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ShareGrant>>;

    /// Append an access log entry.
    async fn append_access_log(&self, entry: &NewAccessLogEntry) -> AppResult<AccessLogEntry>;

    /// All access log entries for a grant, newest first.
    async fn list_access_logs(&self, share_id: ShareId) -> AppResult<Vec<AccessLogEntry>>;
}

/// Read access to owner health data, always scoped by pet.
#[async_trait]
pub trait HealthStore: Send + Sync + 'static {
    /// Find a pet by id.
    async fn find_pet(&self, pet_id: PetId) -> AppResult<Option<PetProfile>>;

    /// Find a pet only if it belongs to `owner`.
    async fn find_owned_pet(&self, pet_id: PetId, owner: UserId) -> AppResult<Option<PetProfile>>;

    /// Most recent records by `date`, newest first. Share-event entries are
    /// excluded.
    async fn recent_records(&self, pet_id: PetId, limit: u32) -> AppResult<Vec<HealthRecord>>;

    /// Most recent vitals by `measured_at`, newest first.
    async fn recent_vitals(&self, pet_id: PetId, limit: u32) -> AppResult<Vec<Vital>>;

    /// Active alerts by `due_date` ascending, undated last. `None` means no limit.
    async fn active_alerts(&self, pet_id: PetId, limit: Option<u32>) -> AppResult<Vec<Alert>>;

    /// Most recent documents by `document_date`, newest first.
    async fn recent_documents(&self, pet_id: PetId, limit: u32) -> AppResult<Vec<Document>>;

    /// Append a record to a pet's health timeline.
    async fn create_record(&self, data: &NewHealthRecord) -> AppResult<HealthRecord>;
}
