//! Share grant and access log repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use livepet_core::error::{AppError, ErrorKind};
use livepet_core::result::AppResult;
use livepet_core::types::{AccessLogId, PageRequest, PageResponse, ShareId, UserId};
use livepet_entity::access_log::{AccessLogEntry, NewAccessLogEntry};
use livepet_entity::share::{NewShareGrant, ShareGrant};

use crate::store::ShareStore;

/// Repository for `health_profile_shares` and `health_share_access_logs`.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareStore for ShareRepository {
    async fn create_share(&self, data: &NewShareGrant) -> AppResult<ShareGrant> {
        sqlx::query_as::<_, ShareGrant>(
            "INSERT INTO health_profile_shares (id, share_token, user_id, pet_id, access_code, \
             recipient_email, recipient_name, message, created_at, expires_at, max_views, \
             allow_health_records, allow_vitals, allow_alerts, allow_documents) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) RETURNING *",
        )
        .bind(ShareId::new())
        .bind(&data.share_token)
        .bind(data.user_id)
        .bind(data.pet_id)
        .bind(&data.access_code)
        .bind(&data.recipient_email)
        .bind(&data.recipient_name)
        .bind(&data.message)
        .bind(data.created_at)
        .bind(data.expires_at)
        .bind(data.max_views)
        .bind(data.visibility.allow_health_records)
        .bind(data.visibility.allow_vitals)
        .bind(data.visibility.allow_alerts)
        .bind(data.visibility.allow_documents)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create share", e))
    }

    async fn find_share_by_id(&self, id: ShareId) -> AppResult<Option<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>("SELECT * FROM health_profile_shares WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))
    }

    async fn find_share_by_token(&self, token: &str) -> AppResult<Option<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>(
            "SELECT * FROM health_profile_shares WHERE share_token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find share by token", e)
        })
    }

    async fn list_shares_by_owner(
        &self,
        owner: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareGrant>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM health_profile_shares WHERE user_id = $1")
                .bind(owner)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count shares", e)
                })?;

        let shares = sqlx::query_as::<_, ShareGrant>(
            "SELECT * FROM health_profile_shares WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(owner)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list shares", e))?;

        Ok(PageResponse::new(shares, page, total.max(0) as u64))
    }

    async fn consume_view(
        &self,
        id: ShareId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ShareGrant>> {
        sqlx::query_as::<_, ShareGrant>(
            "UPDATE health_profile_shares \
             SET views_count = views_count + 1, last_accessed_at = $2 \
             WHERE id = $1 AND status = 'active' AND expires_at >= $2 \
             AND (max_views IS NULL OR views_count < max_views) \
             RETURNING *",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record share view", e))
    }

    async fn revoke_share(
        &self,
        id: ShareId,
        owner: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ShareGrant>> {
        let revoked = sqlx::query_as::<_, ShareGrant>(
            "UPDATE health_profile_shares SET status = 'revoked', revoked_at = $3 \
             WHERE id = $1 AND user_id = $2 AND status = 'active' RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke share", e))?;

        if revoked.is_some() {
            return Ok(revoked);
        }

        // Either not ours, missing, or already revoked.
        sqlx::query_as::<_, ShareGrant>(
            "SELECT * FROM health_profile_shares WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))
    }

    async fn append_access_log(&self, entry: &NewAccessLogEntry) -> AppResult<AccessLogEntry> {
        sqlx::query_as::<_, AccessLogEntry>(
            "INSERT INTO health_share_access_logs \
             (id, share_id, viewed_section, success, ip_address, user_agent, accessed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(AccessLogId::new())
        .bind(entry.share_id)
        .bind(&entry.viewed_section)
        .bind(entry.success)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(entry.accessed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to write access log", e))
    }

    async fn list_access_logs(&self, share_id: ShareId) -> AppResult<Vec<AccessLogEntry>> {
        sqlx::query_as::<_, AccessLogEntry>(
            "SELECT * FROM health_share_access_logs WHERE share_id = $1 ORDER BY accessed_at DESC, id DESC",
        )
        .bind(share_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list access logs", e))
    }
}
