//! Read-side repository for pets and their health data.

use async_trait::async_trait;
use sqlx::PgPool;

use livepet_core::error::{AppError, ErrorKind};
use livepet_core::result::AppResult;
use livepet_core::types::{HealthRecordId, PetId, UserId};
use livepet_entity::health::{
    Alert, Document, HealthRecord, NewHealthRecord, SHARE_EVENT_RECORD_TYPE, Vital,
};
use livepet_entity::pet::PetProfile;

use crate::store::HealthStore;

const PET_COLUMNS: &str = "id, user_id, name, species, breed, photo_url, birth_date";

/// Repository over `pets` and the `health_*` tables.
#[derive(Debug, Clone)]
pub struct HealthRepository {
    pool: PgPool,
}

impl HealthRepository {
    /// Create a new health repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthStore for HealthRepository {
    async fn find_pet(&self, pet_id: PetId) -> AppResult<Option<PetProfile>> {
        sqlx::query_as::<_, PetProfile>(&format!("SELECT {PET_COLUMNS} FROM pets WHERE id = $1"))
            .bind(pet_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find pet", e))
    }

    async fn find_owned_pet(&self, pet_id: PetId, owner: UserId) -> AppResult<Option<PetProfile>> {
        sqlx::query_as::<_, PetProfile>(&format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE id = $1 AND user_id = $2"
        ))
        .bind(pet_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find pet", e))
    }

    async fn recent_records(&self, pet_id: PetId, limit: u32) -> AppResult<Vec<HealthRecord>> {
        sqlx::query_as::<_, HealthRecord>(
            "SELECT * FROM health_records WHERE pet_id = $1 AND record_type <> $3 \
             ORDER BY date DESC LIMIT $2",
        )
        .bind(pet_id)
        .bind(i64::from(limit))
        .bind(SHARE_EVENT_RECORD_TYPE)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load health records", e))
    }

    async fn recent_vitals(&self, pet_id: PetId, limit: u32) -> AppResult<Vec<Vital>> {
        sqlx::query_as::<_, Vital>(
            "SELECT * FROM health_vitals WHERE pet_id = $1 ORDER BY measured_at DESC LIMIT $2",
        )
        .bind(pet_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load vitals", e))
    }

    async fn active_alerts(&self, pet_id: PetId, limit: Option<u32>) -> AppResult<Vec<Alert>> {
        // LIMIT NULL is no limit in PostgreSQL.
        sqlx::query_as::<_, Alert>(
            "SELECT * FROM health_alerts WHERE pet_id = $1 AND status = 'active' \
             ORDER BY due_date ASC NULLS LAST LIMIT $2",
        )
        .bind(pet_id)
        .bind(limit.map(i64::from))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load alerts", e))
    }

    async fn recent_documents(&self, pet_id: PetId, limit: u32) -> AppResult<Vec<Document>> {
        sqlx::query_as::<_, Document>(
            "SELECT * FROM health_documents WHERE pet_id = $1 \
             ORDER BY document_date DESC NULLS LAST LIMIT $2",
        )
        .bind(pet_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load documents", e))
    }

    async fn create_record(&self, data: &NewHealthRecord) -> AppResult<HealthRecord> {
        sqlx::query_as::<_, HealthRecord>(
            "INSERT INTO health_records (id, pet_id, user_id, record_type, title, description, date, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(HealthRecordId::new())
        .bind(data.pet_id)
        .bind(data.user_id)
        .bind(&data.record_type)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.date)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create health record", e))
    }
}
